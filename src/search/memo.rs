use std::ops::ControlFlow;

use log::debug;

use crate::board::{Board, Player};
use crate::errors::SearchOutcome;
use crate::evaluator::{Evaluator, EvaluatorSelection};
use crate::transposition::{NodeId, TranspositionStore};

use super::{check_depth, terminal_utility, MaxBest, MinBest, RootSelection, SearchEngine};
use super::{SearchResult, Utility};

/// Minimax over a game tree that outlives a single decision.
///
/// Every simulated position becomes a node in the transposition store, and
/// a node's children are generated once; later searches through the same
/// positions walk the cached edges and only grow the tree past its frontier.
/// Values are not cached, only the tree shape.
#[derive(Debug)]
pub struct MemoMinimax<B> {
    player: Player,
    selection: EvaluatorSelection,
    moves_made: Option<u32>,
    pruning: bool,
    store: TranspositionStore<B>,
    nodes: u64,
}

impl<B: Board> MemoMinimax<B> {
    pub fn new(player: Player, selection: impl Into<EvaluatorSelection>) -> Self {
        MemoMinimax {
            player,
            selection: selection.into(),
            moves_made: None,
            pruning: false,
            store: TranspositionStore::new(),
            nodes: 0,
        }
    }

    /// Use alpha-beta bookkeeping while walking the tree
    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    /// Start tracking a new game rooted at `board`
    pub fn set_root(&mut self, board: &B) -> SearchOutcome<NodeId> {
        self.store.set_root(board)
    }

    pub fn reset(&mut self) {
        self.store.clear();
    }

    pub fn store(&self) -> &TranspositionStore<B> {
        &self.store
    }

    fn max_value(
        &mut self,
        id: NodeId,
        depth: i32,
        mut alpha: i32,
        beta: i32,
        evaluator: &Evaluator,
    ) -> SearchOutcome<Utility> {
        self.nodes += 1;
        let board = self.store.node(id).board();
        if board.is_game_over() {
            return Ok(terminal_utility(board, self.player));
        }
        if depth == 0 {
            return Ok(Utility::Value(evaluator.evaluate(board)));
        }

        let mut best = MaxBest::default();
        for (_, child) in self.store.expand(id)? {
            match self.min_value(child, depth - 1, alpha, beta, evaluator)? {
                Utility::Win => return Ok(Utility::Win),
                Utility::Loss => continue,
                Utility::Value(value) => {
                    if best.offer(value) {
                        alpha = alpha.max(value);
                    }
                }
            }
            if self.pruning && alpha > beta {
                break;
            }
        }
        Ok(best.into_utility())
    }

    fn min_value(
        &mut self,
        id: NodeId,
        depth: i32,
        alpha: i32,
        mut beta: i32,
        evaluator: &Evaluator,
    ) -> SearchOutcome<Utility> {
        self.nodes += 1;
        let board = self.store.node(id).board();
        if board.is_game_over() {
            return Ok(terminal_utility(board, self.player));
        }
        if depth == 0 {
            return Ok(Utility::Value(evaluator.evaluate(board)));
        }

        let mut best = MinBest::default();
        for (_, child) in self.store.expand(id)? {
            match self.max_value(child, depth - 1, alpha, beta, evaluator)? {
                Utility::Loss => return Ok(Utility::Loss),
                Utility::Win => continue,
                Utility::Value(value) => {
                    if best.offer(value) {
                        beta = beta.min(value);
                    }
                }
            }
            if self.pruning && beta < alpha {
                break;
            }
        }
        Ok(best.into_utility())
    }

    /// Node for the current position, inserting a leaf when earlier
    /// searches never reached it
    fn current_node(&mut self, board: &B) -> SearchOutcome<NodeId> {
        if self.store.root().is_none() {
            return self.store.set_root(board);
        }
        match self.store.lookup(board)? {
            Some(id) => Ok(id),
            None => {
                debug!("Position not in store, starting a new subtree");
                self.store.get_or_insert(board.clone(), None)
            }
        }
    }
}

impl<B: Board> SearchEngine<B> for MemoMinimax<B> {
    fn search(&mut self, board: &B, depth: i32) -> SearchOutcome<SearchResult> {
        check_depth(depth)?;
        self.nodes = 0;

        let evaluator = Evaluator::new(self.player, self.selection.resolve(self.moves_made));
        let current = self.current_node(board)?;
        let mut root = RootSelection::new();
        for (mv, child) in self.store.expand(current)? {
            let alpha = match (self.pruning, root.best_value()) {
                (true, Some(best)) => best,
                _ => i32::MIN,
            };
            let utility = self.min_value(child, depth - 1, alpha, i32::MAX, &evaluator)?;
            if let ControlFlow::Break(()) = root.offer(mv, utility) {
                break;
            }
        }

        debug!(
            "Memo search visited {} nodes, store holds {} ({} expanded)",
            self.nodes,
            self.store.len(),
            self.store.expanded_count()
        );
        Ok(root.finish(depth, self.nodes))
    }

    fn player(&self) -> Player {
        self.player
    }

    fn set_moves_made(&mut self, moves_made: Option<u32>) {
        self.moves_made = moves_made;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Move;
    use crate::errors::SearchError;
    use crate::evaluator::Heuristic;
    use crate::fixtures::{SowBoard, TreeBuilder};
    use crate::search::{AlphaBeta, Minimax};

    fn positions() -> Vec<SowBoard> {
        vec![
            SowBoard::uniform(2),
            SowBoard::uniform(3).with_credit([0, 1]),
            SowBoard::new([[4, 0, 3, 1, 0, 2], [1, 5, 0, 2, 2, 1]], Player::First),
            SowBoard::uniform(3),
        ]
    }

    #[test]
    fn test_fresh_store_matches_plain_minimax() {
        for board in positions() {
            let player = board.turn_player();
            for depth in 1..=4 {
                let plain = Minimax::new(player, Heuristic::ProgressWeighted)
                    .search(&board, depth)
                    .unwrap();
                let mut memo = MemoMinimax::new(player, Heuristic::ProgressWeighted);
                memo.set_root(&board).unwrap();
                let cached = memo.search(&board, depth).unwrap();
                assert_eq!(plain.best_move, cached.best_move, "{board:?} depth {depth}");
                assert_eq!(plain.utility, cached.utility);
                assert_eq!(plain.nodes, cached.nodes);
            }
        }
    }

    #[test]
    fn test_pruning_matches_alpha_beta() {
        for board in positions() {
            let player = board.turn_player();
            let pruned = AlphaBeta::new(player, Heuristic::ScoreAndBeanDifference)
                .search(&board, 4)
                .unwrap();
            let mut memo =
                MemoMinimax::new(player, Heuristic::ScoreAndBeanDifference).with_pruning(true);
            let cached = memo.search(&board, 4).unwrap();
            assert_eq!(pruned.best_move, cached.best_move);
            assert_eq!(pruned.utility, cached.utility);
            assert_eq!(pruned.nodes, cached.nodes);
        }
    }

    #[test]
    fn test_repeat_search_reuses_tree() {
        let board = SowBoard::uniform(2);
        let mut memo = MemoMinimax::new(Player::First, Heuristic::ScoreAndBeanDifference);
        memo.set_root(&board).unwrap();

        let first = memo.search(&board, 3).unwrap();
        let size = memo.store().len();
        let expanded = memo.store().expanded_count();
        let second = memo.search(&board, 3).unwrap();
        assert_eq!(first, second);
        assert_eq!(memo.store().len(), size);
        assert_eq!(memo.store().expanded_count(), expanded);

        // A deeper search only grows the frontier
        memo.search(&board, 4).unwrap();
        assert!(memo.store().len() > size);
    }

    #[test]
    fn test_depth_one_expands_only_the_root() {
        let board = SowBoard::uniform(2);
        let mut memo = MemoMinimax::new(Player::First, Heuristic::ScoreDifference);
        memo.set_root(&board).unwrap();
        memo.search(&board, 1).unwrap();
        assert_eq!(memo.store().expanded_count(), 1);
        assert_eq!(memo.store().len(), 7);
    }

    #[test]
    fn test_later_move_continues_from_cached_subtree() {
        let board = SowBoard::uniform(2);
        let mut memo = MemoMinimax::new(Player::First, Heuristic::ScoreAndBeanDifference);
        memo.set_root(&board).unwrap();
        memo.search(&board, 3).unwrap();

        // Two plies later the position is already in the tree
        let mut later = board.clone();
        later.apply(Move::Sow(0));
        later.apply(Move::Sow(0));
        let cached = memo.store().lookup(&later).unwrap();
        assert!(cached.is_some());

        let size = memo.store().len();
        let result = memo.search(&later, 1).unwrap();
        assert!(result.best_move.is_some());
        assert_eq!(memo.store().len(), size);
    }

    #[test]
    fn test_unknown_position_gets_a_fresh_node() {
        let mut memo = MemoMinimax::new(Player::First, Heuristic::ScoreDifference);
        memo.set_root(&SowBoard::uniform(2)).unwrap();
        let elsewhere = SowBoard::uniform(1);
        assert_eq!(memo.store().lookup(&elsewhere).unwrap(), None);
        memo.search(&elsewhere, 1).unwrap();
        assert!(memo.store().lookup(&elsewhere).unwrap().is_some());
    }

    #[test]
    fn test_depth_one_takes_immediate_win() {
        let mut tree = TreeBuilder::new();
        let root = tree.node(Player::First, [0, 0]);
        let quiet = tree.node(Player::Second, [12, 0]);
        let won = tree.terminal(Player::Second, Some(Player::First));
        tree.edge(root, Move::Sow(2), quiet).edge(root, Move::Sow(5), won);
        let board = tree.build();

        let mut memo = MemoMinimax::new(Player::First, Heuristic::ScoreDifference);
        memo.set_root(&board).unwrap();
        let result = memo.search(&board, 1).unwrap();
        assert_eq!(result.best_move, Some(Move::Sow(5)));
        assert_eq!(result.utility, Utility::Win);
    }

    #[test]
    fn test_rejects_non_positive_depth() {
        let mut memo = MemoMinimax::new(Player::First, Heuristic::ScoreDifference);
        assert_eq!(
            memo.search(&SowBoard::uniform(2), 0),
            Err(SearchError::InvalidDepth { depth: 0 })
        );
    }

    #[test]
    fn test_search_leaves_board_untouched() {
        let board = SowBoard::uniform(3).with_credit([1, 1]);
        let before = board.clone();
        let mut memo = MemoMinimax::new(Player::First, Heuristic::ProgressDoubleScore);
        memo.set_root(&board).unwrap();
        memo.search(&board, 3).unwrap();
        assert_eq!(board, before);
    }
}
