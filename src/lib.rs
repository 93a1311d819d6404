// Sowing AI Library - Core Module Organization
//
// Adversarial search for a two-player sowing game: the board seam, the
// evaluator family, three search engines, the persistent game tree, the
// adaptive depth controller and the agent that ties them together.

// Board interface and value types
pub mod board;

// Search core
pub mod evaluator;
pub mod search;
pub mod transposition;

// Agent orchestration
pub mod config;
pub mod controller;
pub mod errors;
pub mod players;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export common types for convenient access
pub use crate::board::{Board, Move, Player, BEAN_CAP, PITS_PER_SIDE};
pub use crate::config::{AgentConfig, EngineKind};
pub use crate::controller::{Backoff, ControllerState, DepthController, DepthLimits};
pub use crate::errors::{AgentError, ConfigError, SearchError};
pub use crate::evaluator::{Evaluator, EvaluatorSelection, Heuristic};
pub use crate::players::{BotPlayer, SearchPlayer};
pub use crate::search::{AlphaBeta, MemoMinimax, Minimax, SearchEngine, SearchResult, Utility};
pub use crate::transposition::{PositionKey, TranspositionStore};
