use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Player, BEAN_CAP};
use crate::errors::ConfigError;

/// Heuristic values are clamped into `[-HEURISTIC_BOUND, HEURISTIC_BOUND]`
pub const HEURISTIC_BOUND: i32 = 1_000_000;

/// How the progress factor grows as beans leave the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Progress {
    /// Constant factor of 1
    None,
    /// `BEAN_CAP - beans in play`
    Consumed,
    /// `BEAN_CAP / max(beans in play, 1)`
    Ratio,
}

impl Progress {
    fn factor(self, beans_in_play: i32) -> i32 {
        match self {
            Progress::None => 1,
            Progress::Consumed => BEAN_CAP - beans_in_play,
            Progress::Ratio => BEAN_CAP / beans_in_play.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicWeights {
    pub score: i32,
    pub beans_num: i32,
    pub beans_den: i32,
    pub progress: Progress,
    /// Whether the progress factor multiplies the bean term too
    pub scale_beans: bool,
}

impl HeuristicWeights {
    const fn new(score: i32, beans: (i32, i32), progress: Progress, scale_beans: bool) -> Self {
        Self {
            score,
            beans_num: beans.0,
            beans_den: beans.1,
            progress,
            scale_beans,
        }
    }
}

/// The heuristic presets the agent variants were tuned with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    ScoreDifference,
    ScoreAndBeanDifference,
    ScoreAndHalfBeanDifference,
    ProgressScoreAndHalfBeans,
    ProgressWeighted,
    RatioWeighted,
    ProgressDoubleScore,
    ProgressScoreDifference,
}

pub const HEURISTICS: [Heuristic; 8] = [
    Heuristic::ScoreDifference,
    Heuristic::ScoreAndBeanDifference,
    Heuristic::ScoreAndHalfBeanDifference,
    Heuristic::ProgressScoreAndHalfBeans,
    Heuristic::ProgressWeighted,
    Heuristic::RatioWeighted,
    Heuristic::ProgressDoubleScore,
    Heuristic::ProgressScoreDifference,
];

impl Heuristic {
    pub fn weights(self) -> HeuristicWeights {
        use Progress::{Consumed, Ratio};
        match self {
            Heuristic::ScoreDifference => HeuristicWeights::new(1, (0, 1), Progress::None, false),
            Heuristic::ScoreAndBeanDifference => {
                HeuristicWeights::new(1, (1, 1), Progress::None, false)
            }
            Heuristic::ScoreAndHalfBeanDifference => {
                HeuristicWeights::new(1, (1, 2), Progress::None, false)
            }
            Heuristic::ProgressScoreAndHalfBeans => {
                HeuristicWeights::new(1, (1, 2), Consumed, false)
            }
            Heuristic::ProgressWeighted => HeuristicWeights::new(3, (1, 1), Consumed, true),
            Heuristic::RatioWeighted => HeuristicWeights::new(3, (1, 1), Ratio, true),
            Heuristic::ProgressDoubleScore => HeuristicWeights::new(2, (1, 2), Consumed, true),
            Heuristic::ProgressScoreDifference => HeuristicWeights::new(1, (0, 1), Consumed, true),
        }
    }

    /// Numeric selector used by older agent configurations
    pub fn selector(self) -> u8 {
        HEURISTICS
            .iter()
            .position(|&h| h == self)
            .map(|i| i as u8)
            .unwrap_or_default()
    }

    pub fn from_selector(selector: u8) -> Result<Self, ConfigError> {
        HEURISTICS
            .get(selector as usize)
            .copied()
            .ok_or_else(|| ConfigError::unknown_heuristic(selector))
    }

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::ScoreDifference => "score_difference",
            Heuristic::ScoreAndBeanDifference => "score_and_bean_difference",
            Heuristic::ScoreAndHalfBeanDifference => "score_and_half_bean_difference",
            Heuristic::ProgressScoreAndHalfBeans => "progress_score_and_half_beans",
            Heuristic::ProgressWeighted => "progress_weighted",
            Heuristic::RatioWeighted => "ratio_weighted",
            Heuristic::ProgressDoubleScore => "progress_double_score",
            Heuristic::ProgressScoreDifference => "progress_score_difference",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Heuristic {
    type Err = ConfigError;

    /// Accepts either a preset name or its numeric selector
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(selector) = trimmed.parse::<u8>() {
            return Heuristic::from_selector(selector);
        }
        HEURISTICS
            .iter()
            .copied()
            .find(|h| h.name() == trimmed)
            .ok_or_else(|| ConfigError::unknown_heuristic(trimmed))
    }
}

/// Switch to a different heuristic for the first few moves of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHeuristic {
    pub until_move: u32,
    pub heuristic: Heuristic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorSelection {
    pub base: Heuristic,
    #[serde(default)]
    pub opening: Option<OpeningHeuristic>,
}

impl EvaluatorSelection {
    pub fn fixed(base: Heuristic) -> Self {
        Self {
            base,
            opening: None,
        }
    }

    /// Heuristic to use given how many moves the agent has made so far.
    /// Without a move count the base heuristic applies.
    pub fn resolve(&self, moves_made: Option<u32>) -> Heuristic {
        match (self.opening, moves_made) {
            (Some(opening), Some(made)) if made < opening.until_move => opening.heuristic,
            _ => self.base,
        }
    }
}

impl From<Heuristic> for EvaluatorSelection {
    fn from(heuristic: Heuristic) -> Self {
        Self::fixed(heuristic)
    }
}

/// Scores non-terminal positions from one player's side
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    player: Player,
    weights: HeuristicWeights,
}

impl Evaluator {
    pub fn new(player: Player, heuristic: Heuristic) -> Self {
        Self::with_weights(player, heuristic.weights())
    }

    pub fn with_weights(player: Player, weights: HeuristicWeights) -> Self {
        Self { player, weights }
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn evaluate<B: Board>(&self, board: &B) -> i32 {
        let w = &self.weights;
        let me = self.player;
        let them = me.opponent();

        let score_diff = board.score(me) - board.score(them);
        let my_beans = board.beans_on_side(me);
        let their_beans = board.beans_on_side(them);
        let factor = w.progress.factor(my_beans + their_beans) as i64;

        let score_term = w.score as i64 * score_diff as i64;
        let bean_term = if w.beans_den == 0 {
            0
        } else {
            w.beans_num as i64 * (my_beans - their_beans) as i64 / w.beans_den as i64
        };

        let value = if w.scale_beans {
            factor * (score_term + bean_term)
        } else {
            factor * score_term + bean_term
        };

        value.clamp(-(HEURISTIC_BOUND as i64), HEURISTIC_BOUND as i64) as i32
    }
}
