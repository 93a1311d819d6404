// Search module - depth-bounded adversarial search
//
// Three engines share one contract: plain minimax, minimax with alpha-beta
// pruning, and a memoized variant that keeps the game tree between moves.
// All of them score positions from the searching player's side only; the
// maximizer and minimizer layers read the same utility.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Move, Player};
use crate::errors::{SearchError, SearchOutcome};

pub mod alpha_beta;
pub mod memo;
pub mod minimax;

pub use self::alpha_beta::AlphaBeta;
pub use self::memo::MemoMinimax;
pub use self::minimax::Minimax;

/// Value of a position for the searching player.
///
/// Proven outcomes are tags rather than extreme integers, so no heuristic
/// value can be mistaken for one. Ordered `Loss < Value(_) < Win`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Utility {
    Loss,
    Value(i32),
    Win,
}

impl Utility {
    pub fn is_proven(&self) -> bool {
        !matches!(self, Utility::Value(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Move to play; `None` when every line was a proven loss
    pub best_move: Option<Move>,
    /// Every root branch was searched to a heuristic value
    pub full_simulation: bool,
    /// No surviving line was found; spend a skip if one is available
    pub should_skip: bool,
    pub utility: Utility,
    /// Positions entered below the root
    pub nodes: u64,
    pub depth: i32,
}

/// Shared contract of the search engines
pub trait SearchEngine<B: Board> {
    /// Search `depth` plies ahead of `board` and pick a move for the
    /// engine's player. `board` itself is never modified.
    fn search(&mut self, board: &B, depth: i32) -> SearchOutcome<SearchResult>;

    /// The player whose utility is maximized
    fn player(&self) -> Player;

    /// How many moves the agent has made so far, for move-dependent heuristics
    fn set_moves_made(&mut self, moves_made: Option<u32>);
}

pub(crate) fn check_depth(depth: i32) -> SearchOutcome<()> {
    if depth <= 0 {
        return Err(SearchError::invalid_depth(depth));
    }
    Ok(())
}

/// Utility of a finished game; a draw counts as a loss
pub(crate) fn terminal_utility<B: Board>(board: &B, player: Player) -> Utility {
    if board.winner() == Some(player) {
        Utility::Win
    } else {
        Utility::Loss
    }
}

/// Running best of a maximizing layer: proven losses are skipped, values
/// must be strictly better to replace the incumbent.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct MaxBest(Option<i32>);

impl MaxBest {
    /// Returns `true` if `value` became the new best
    pub fn offer(&mut self, value: i32) -> bool {
        match self.0 {
            Some(best) if value <= best => false,
            _ => {
                self.0 = Some(value);
                true
            }
        }
    }

    pub fn into_utility(self) -> Utility {
        self.0.map_or(Utility::Loss, Utility::Value)
    }
}

/// Running best of a minimizing layer, the mirror of `MaxBest`
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct MinBest(Option<i32>);

impl MinBest {
    pub fn offer(&mut self, value: i32) -> bool {
        match self.0 {
            Some(best) if value >= best => false,
            _ => {
                self.0 = Some(value);
                true
            }
        }
    }

    pub fn into_utility(self) -> Utility {
        self.0.map_or(Utility::Win, Utility::Value)
    }
}

/// Move selection at the root of a search
#[derive(Debug)]
pub(crate) struct RootSelection {
    best: Option<(Move, i32)>,
    winning: Option<Move>,
    full_simulation: bool,
}

impl RootSelection {
    pub fn new() -> Self {
        Self {
            best: None,
            winning: None,
            full_simulation: true,
        }
    }

    /// Record the utility of playing `mv`. Breaks once a forced win is found.
    pub fn offer(&mut self, mv: Move, utility: Utility) -> ControlFlow<()> {
        match utility {
            Utility::Win => {
                self.winning = Some(mv);
                self.full_simulation = false;
                ControlFlow::Break(())
            }
            Utility::Loss => {
                self.full_simulation = false;
                ControlFlow::Continue(())
            }
            Utility::Value(value) => {
                if self.best.map_or(true, |(_, best)| value > best) {
                    self.best = Some((mv, value));
                }
                ControlFlow::Continue(())
            }
        }
    }

    pub fn best_value(&self) -> Option<i32> {
        self.best.map(|(_, value)| value)
    }

    pub fn finish(self, depth: i32, nodes: u64) -> SearchResult {
        let (best_move, utility) = match (self.winning, self.best) {
            (Some(mv), _) => (Some(mv), Utility::Win),
            (None, Some((mv, value))) => (Some(mv), Utility::Value(value)),
            (None, None) => (None, Utility::Loss),
        };
        SearchResult {
            best_move,
            full_simulation: self.full_simulation,
            should_skip: best_move.is_none(),
            utility,
            nodes,
            depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utility_ordering() {
        assert!(Utility::Loss < Utility::Value(i32::MIN));
        assert!(Utility::Value(i32::MAX) < Utility::Win);
        assert!(Utility::Value(-3) < Utility::Value(4));
        assert!(Utility::Win.is_proven());
        assert!(!Utility::Value(0).is_proven());
    }

    #[test]
    fn test_check_depth_rejects_non_positive() {
        assert_eq!(check_depth(0), Err(SearchError::InvalidDepth { depth: 0 }));
        assert!(check_depth(-2).is_err());
        assert!(check_depth(1).is_ok());
    }

    #[test]
    fn test_root_selection_keeps_first_of_equal_values() {
        let mut root = RootSelection::new();
        let _ = root.offer(Move::Sow(0), Utility::Value(5));
        let _ = root.offer(Move::Sow(1), Utility::Value(5));
        let _ = root.offer(Move::Sow(2), Utility::Value(3));
        let result = root.finish(2, 0);
        assert_eq!(result.best_move, Some(Move::Sow(0)));
        assert_eq!(result.utility, Utility::Value(5));
        assert!(result.full_simulation);
        assert!(!result.should_skip);
    }

    #[test]
    fn test_root_selection_all_losing_recommends_skip() {
        let mut root = RootSelection::new();
        let _ = root.offer(Move::Sow(0), Utility::Loss);
        let _ = root.offer(Move::Sow(1), Utility::Loss);
        let result = root.finish(3, 0);
        assert_eq!(result.best_move, None);
        assert!(result.should_skip);
        assert!(!result.full_simulation);
        assert_eq!(result.utility, Utility::Loss);
    }

    #[test]
    fn test_root_selection_stops_on_win() {
        let mut root = RootSelection::new();
        let _ = root.offer(Move::Sow(0), Utility::Value(10));
        assert!(root.offer(Move::Sow(3), Utility::Win).is_break());
        let result = root.finish(1, 0);
        assert_eq!(result.best_move, Some(Move::Sow(3)));
        assert_eq!(result.utility, Utility::Win);
    }

    #[test]
    fn test_layer_bests_default_to_proven_outcomes() {
        assert_eq!(MaxBest::default().into_utility(), Utility::Loss);
        assert_eq!(MinBest::default().into_utility(), Utility::Win);

        let mut max = MaxBest::default();
        assert!(max.offer(2));
        assert!(!max.offer(2));
        assert!(max.offer(7));
        assert_eq!(max.into_utility(), Utility::Value(7));

        let mut min = MinBest::default();
        assert!(min.offer(2));
        assert!(!min.offer(9));
        assert_eq!(min.into_utility(), Utility::Value(2));
    }
}
