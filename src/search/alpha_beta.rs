use std::ops::ControlFlow;

use crate::board::{Board, Player};
use crate::errors::SearchOutcome;
use crate::evaluator::{Evaluator, EvaluatorSelection};

use super::{check_depth, terminal_utility, MaxBest, MinBest, RootSelection, SearchEngine};
use super::{SearchResult, Utility};

/// Minimax with alpha-beta pruning.
///
/// `alpha` and `beta` bound heuristic values only; proven wins and losses
/// short-circuit before any window bookkeeping. `i32::MIN`/`i32::MAX` are
/// outside the clamped heuristic range, so they serve as open bounds.
#[derive(Debug, Clone)]
pub struct AlphaBeta {
    player: Player,
    selection: EvaluatorSelection,
    moves_made: Option<u32>,
    nodes: u64,
}

impl AlphaBeta {
    pub fn new(player: Player, selection: impl Into<EvaluatorSelection>) -> Self {
        AlphaBeta {
            player,
            selection: selection.into(),
            moves_made: None,
            nodes: 0,
        }
    }

    pub fn with_moves_made(mut self, moves_made: u32) -> Self {
        self.moves_made = Some(moves_made);
        self
    }

    fn max_value<B: Board>(
        &mut self,
        board: &B,
        depth: i32,
        mut alpha: i32,
        beta: i32,
        evaluator: &Evaluator,
    ) -> Utility {
        self.nodes += 1;
        if board.is_game_over() {
            return terminal_utility(board, self.player);
        }
        if depth == 0 {
            return Utility::Value(evaluator.evaluate(board));
        }

        let mut best = MaxBest::default();
        for mv in board.legal_moves() {
            let mut child = board.clone();
            child.apply(mv);
            match self.min_value(&child, depth - 1, alpha, beta, evaluator) {
                Utility::Win => return Utility::Win,
                Utility::Loss => continue,
                Utility::Value(value) => {
                    if best.offer(value) {
                        alpha = alpha.max(value);
                    }
                }
            }
            if alpha > beta {
                break; // beta cut-off
            }
        }
        best.into_utility()
    }

    fn min_value<B: Board>(
        &mut self,
        board: &B,
        depth: i32,
        alpha: i32,
        mut beta: i32,
        evaluator: &Evaluator,
    ) -> Utility {
        self.nodes += 1;
        if board.is_game_over() {
            return terminal_utility(board, self.player);
        }
        if depth == 0 {
            return Utility::Value(evaluator.evaluate(board));
        }

        let mut best = MinBest::default();
        for mv in board.legal_moves() {
            let mut child = board.clone();
            child.apply(mv);
            match self.max_value(&child, depth - 1, alpha, beta, evaluator) {
                Utility::Loss => return Utility::Loss,
                Utility::Win => continue,
                Utility::Value(value) => {
                    if best.offer(value) {
                        beta = beta.min(value);
                    }
                }
            }
            if beta < alpha {
                break; // alpha cut-off
            }
        }
        best.into_utility()
    }
}

impl<B: Board> SearchEngine<B> for AlphaBeta {
    fn search(&mut self, board: &B, depth: i32) -> SearchOutcome<SearchResult> {
        check_depth(depth)?;
        self.nodes = 0;

        let evaluator = Evaluator::new(self.player, self.selection.resolve(self.moves_made));
        let mut root = RootSelection::new();
        for mv in board.legal_moves() {
            let alpha = root.best_value().unwrap_or(i32::MIN);
            let mut child = board.clone();
            child.apply(mv);
            let utility = self.min_value(&child, depth - 1, alpha, i32::MAX, &evaluator);
            if let ControlFlow::Break(()) = root.offer(mv, utility) {
                break;
            }
        }

        Ok(root.finish(depth, self.nodes))
    }

    fn player(&self) -> Player {
        self.player
    }

    fn set_moves_made(&mut self, moves_made: Option<u32>) {
        self.moves_made = moves_made;
    }
}
