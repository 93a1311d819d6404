use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Player;

/// Top-level error type for the agent
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentError {
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Caller contract violations raised by the search engines
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchError {
    #[error("Search depth must be at least 1, got {depth}")]
    InvalidDepth { depth: i32 },

    #[error("Pit {pit} of {player:?} holds {count} beans, which does not fit a position key")]
    PitOverflow { player: Player, pit: usize, count: u32 },

    #[error("Score or credit {value} of {player:?} does not fit a position key")]
    TallyOverflow { player: Player, value: i32 },

    #[error("No legal moves available")]
    NoLegalMoves,
}

/// Invalid agent configuration
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("Unknown heuristic selector: {selector}")]
    UnknownHeuristic { selector: String },

    #[error("Unknown preset: {name}")]
    UnknownPreset { name: String },

    #[error("Invalid depth limits: {details}")]
    InvalidDepthLimits { details: String },

    #[error("Invalid timing: {details}")]
    InvalidTiming { details: String },

    #[error("Could not read configuration: {details}")]
    Io { details: String },

    #[error("Could not parse configuration: {details}")]
    Parse { details: String },
}

/// Result type aliases for convenience
pub type AgentResult<T> = Result<T, AgentError>;
pub type SearchOutcome<T> = Result<T, SearchError>;
pub type ConfigResult<T> = Result<T, ConfigError>;

impl SearchError {
    pub fn invalid_depth(depth: i32) -> Self {
        Self::InvalidDepth { depth }
    }
}

impl ConfigError {
    pub fn unknown_heuristic(selector: impl ToString) -> Self {
        Self::UnknownHeuristic {
            selector: selector.to_string(),
        }
    }

    pub fn depth_limits(details: impl Into<String>) -> Self {
        Self::InvalidDepthLimits {
            details: details.into(),
        }
    }

    pub fn timing(details: impl Into<String>) -> Self {
        Self::InvalidTiming {
            details: details.into(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io {
            details: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse {
            details: err.to_string(),
        }
    }
}
