// Transposition store - the persistent game tree of one game
//
// Nodes live in an arena and are addressed by index; every position is
// keyed by its `PositionKey`, so a position reached through different move
// orders maps to a single node. Nothing is evicted: the store grows for the
// whole game and must be reset before the next one.

use log::debug;

use crate::board::{Board, Move, Player};
use crate::errors::SearchOutcome;

pub mod arena;
pub mod key;

pub use self::arena::{NodeArena, NodeId};
pub use self::key::PositionKey;

/// A position in the persistent tree
#[derive(Debug, Clone)]
pub struct TreeNode<B> {
    board: B,
    origin: Option<Move>,
    to_move: Player,
    children: Option<Vec<(Move, NodeId)>>,
}

impl<B: Board> TreeNode<B> {
    fn new(board: B, origin: Option<Move>) -> Self {
        let to_move = board.turn_player();
        TreeNode {
            board,
            origin,
            to_move,
            children: None,
        }
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    /// Move that first produced this position; `None` for a root
    pub fn origin(&self) -> Option<Move> {
        self.origin
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Edges to child positions, once expanded
    pub fn children(&self) -> Option<&[(Move, NodeId)]> {
        self.children.as_deref()
    }

    pub fn is_expanded(&self) -> bool {
        self.children.is_some()
    }
}

#[derive(Debug)]
pub struct TranspositionStore<B> {
    nodes: NodeArena<PositionKey, TreeNode<B>>,
    root: Option<NodeId>,
}

impl<B: Board> Default for TranspositionStore<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Board> TranspositionStore<B> {
    pub fn new() -> Self {
        TranspositionStore {
            nodes: NodeArena::new(),
            root: None,
        }
    }

    /// Forget the previous game and root the tree at `board`
    pub fn set_root(&mut self, board: &B) -> SearchOutcome<NodeId> {
        self.clear();
        let id = self.get_or_insert(board.clone(), None)?;
        self.root = Some(id);
        Ok(id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn lookup(&self, board: &B) -> SearchOutcome<Option<NodeId>> {
        Ok(self.nodes.get(&PositionKey::of(board)?))
    }

    /// Node for `board`, inserting a fresh leaf if the position is new
    pub fn get_or_insert(&mut self, board: B, origin: Option<Move>) -> SearchOutcome<NodeId> {
        let key = PositionKey::of(&board)?;
        let (id, _) = self
            .nodes
            .get_or_insert_with(key, || TreeNode::new(board, origin));
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> &TreeNode<B> {
        self.nodes.node(id)
    }

    /// Children of `id`, generating them the first time only. Children
    /// already in the store are shared rather than duplicated.
    pub fn expand(&mut self, id: NodeId) -> SearchOutcome<Vec<(Move, NodeId)>> {
        if let Some(children) = self.nodes.node(id).children() {
            return Ok(children.to_vec());
        }

        let parent = self.nodes.node(id).board().clone();
        let mut children = Vec::new();
        for mv in parent.legal_moves() {
            let mut child = parent.clone();
            child.apply(mv);
            let child_id = self.get_or_insert(child, Some(mv))?;
            children.push((mv, child_id));
        }
        self.nodes.node_mut(id).children = Some(children.clone());
        Ok(children)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes whose children have been generated
    pub fn expanded_count(&self) -> usize {
        self.nodes.iter().filter(|(_, node)| node.is_expanded()).count()
    }

    pub fn clear(&mut self) {
        if !self.nodes.is_empty() {
            debug!("Dropping transposition store with {} nodes", self.nodes.len());
        }
        self.nodes.clear();
        self.root = None;
    }
}
