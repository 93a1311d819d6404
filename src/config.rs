// Agent configuration
//
// Every agent variant is one `AgentConfig`: which engine to run, which
// evaluator, and the depth/timing limits of its controller. The tuned
// variants are available as named presets; custom ones load from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::controller::{Backoff, DepthLimits};
use crate::errors::{ConfigError, ConfigResult};
use crate::evaluator::{EvaluatorSelection, Heuristic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Minimax,
    AlphaBeta,
    Memo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    pub engine: EngineKind,
    /// Alpha-beta bookkeeping inside the memoized engine
    #[serde(default)]
    pub memo_pruning: bool,
    pub evaluator: EvaluatorSelection,
    pub depth: DepthLimits,
    /// Never open the game with a skip; play a random move instead
    #[serde(default)]
    pub spare_opening_skip: bool,
}

pub const PRESET_NAMES: [&str; 6] = [
    "baseline",
    "steady",
    "deep_late",
    "lean",
    "exhaustive",
    "memo",
];

impl Default for AgentConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

impl AgentConfig {
    pub fn preset(name: &str) -> ConfigResult<Self> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "steady" => Ok(Self::steady()),
            "deep_late" => Ok(Self::deep_late()),
            "lean" => Ok(Self::lean()),
            "exhaustive" => Ok(Self::exhaustive()),
            "memo" => Ok(Self::memo()),
            _ => Err(ConfigError::UnknownPreset {
                name: name.to_owned(),
            }),
        }
    }

    pub fn presets() -> Vec<Self> {
        vec![
            Self::baseline(),
            Self::steady(),
            Self::deep_late(),
            Self::lean(),
            Self::exhaustive(),
            Self::memo(),
        ]
    }

    fn alpha_beta(name: &str, heuristic: Heuristic, depth: DepthLimits) -> Self {
        AgentConfig {
            name: name.to_owned(),
            engine: EngineKind::AlphaBeta,
            memo_pruning: false,
            evaluator: heuristic.into(),
            depth,
            spare_opening_skip: false,
        }
    }

    pub fn baseline() -> Self {
        Self::alpha_beta("baseline", Heuristic::ProgressWeighted, DepthLimits::default())
    }

    /// Single cap, long first move
    pub fn steady() -> Self {
        Self::alpha_beta(
            "steady",
            Heuristic::ScoreAndBeanDifference,
            DepthLimits {
                max_depth: 15,
                early_max_depth: 15,
                early_moves: 0,
                first_move_time_ms: 30_000,
                ..DepthLimits::default()
            },
        )
    }

    pub fn deep_late() -> Self {
        Self::alpha_beta(
            "deep_late",
            Heuristic::ProgressDoubleScore,
            DepthLimits {
                max_depth: 11,
                early_max_depth: 10,
                early_moves: 10,
                ..DepthLimits::default()
            },
        )
    }

    pub fn lean() -> Self {
        Self::alpha_beta(
            "lean",
            Heuristic::ProgressScoreDifference,
            DepthLimits {
                max_depth: 10,
                early_max_depth: 9,
                early_moves: 6,
                ..DepthLimits::default()
            },
        )
    }

    /// Plain minimax; deepens only after searches that saw every branch through
    pub fn exhaustive() -> Self {
        AgentConfig {
            name: "exhaustive".to_owned(),
            engine: EngineKind::Minimax,
            memo_pruning: false,
            evaluator: Heuristic::ScoreAndBeanDifference.into(),
            depth: DepthLimits {
                max_depth: 15,
                early_max_depth: 15,
                early_moves: 0,
                first_move_time_ms: 30_000,
                backoff: Backoff::Decrement(2),
                grow_requires_full_simulation: true,
                ..DepthLimits::default()
            },
            spare_opening_skip: false,
        }
    }

    /// The memoized engine keeps every searched node for the whole game, so
    /// it runs pruned and shallower than the stateless presets
    pub fn memo() -> Self {
        AgentConfig {
            name: "memo".to_owned(),
            engine: EngineKind::Memo,
            memo_pruning: true,
            evaluator: Heuristic::ScoreDifference.into(),
            depth: DepthLimits {
                initial_depth: 5,
                first_move_depth: 6,
                max_depth: 7,
                early_max_depth: 6,
                early_moves: 8,
                first_move_time_ms: 30_000,
                ..DepthLimits::default()
            },
            spare_opening_skip: true,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.depth.validate()
    }

    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: AgentConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
