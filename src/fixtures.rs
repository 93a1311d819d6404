// Test boards
//
// `TreeBoard` replays a hand-written game tree so tests can pin exact
// outcomes; `SowBoard` is a compact sowing game with enough branching to
// compare the search engines against each other.

use std::rc::Rc;

use crate::board::{Board, Move, Pits, Player, PITS_PER_SIDE};

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptNode {
    pub to_move: Player,
    pub edges: Vec<(Move, usize)>,
    pub scores: [i32; 2],
    pub credit: [i32; 2],
    pub pits: Pits,
    pub finished: bool,
    pub winner: Option<Player>,
}

/// Builds a scripted game tree; node 0 is the root.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<ScriptNode>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an in-progress node whose evaluation is driven by `scores`.
    /// Default pits are balanced but unique per node, so scripted positions
    /// never share a position key by accident.
    pub fn node(&mut self, to_move: Player, scores: [i32; 2]) -> usize {
        let id = self.nodes.len();
        let mut pits = [[1; PITS_PER_SIDE]; 2];
        pits[0][0] += id as u32;
        pits[1][0] += id as u32;
        self.nodes.push(ScriptNode {
            to_move,
            edges: Vec::new(),
            scores,
            credit: [0, 0],
            pits,
            finished: false,
            winner: None,
        });
        id
    }

    /// Add a finished node.
    pub fn terminal(&mut self, to_move: Player, winner: Option<Player>) -> usize {
        let id = self.node(to_move, [0, 0]);
        self.nodes[id].finished = true;
        self.nodes[id].winner = winner;
        id
    }

    pub fn edge(&mut self, from: usize, mv: Move, to: usize) -> &mut Self {
        self.nodes[from].edges.push((mv, to));
        self
    }

    pub fn pits(&mut self, node: usize, pits: Pits) -> &mut Self {
        self.nodes[node].pits = pits;
        self
    }

    pub fn credit(&mut self, node: usize, credit: [i32; 2]) -> &mut Self {
        self.nodes[node].credit = credit;
        self
    }

    pub fn build(self) -> TreeBoard {
        TreeBoard {
            nodes: Rc::new(self.nodes),
            at: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeBoard {
    nodes: Rc<Vec<ScriptNode>>,
    at: usize,
}

impl TreeBoard {
    fn current(&self) -> &ScriptNode {
        &self.nodes[self.at]
    }

    pub fn position(&self) -> usize {
        self.at
    }
}

impl Board for TreeBoard {
    fn legal_moves(&self) -> Vec<Move> {
        self.current().edges.iter().map(|(mv, _)| *mv).collect()
    }

    fn apply(&mut self, mv: Move) {
        let next = self
            .current()
            .edges
            .iter()
            .find(|(edge, _)| *edge == mv)
            .map(|(_, to)| *to)
            .expect("scripted tree has no such move");
        self.at = next;
    }

    fn is_game_over(&self) -> bool {
        self.current().finished
    }

    fn winner(&self) -> Option<Player> {
        self.current().winner
    }

    fn score(&self, player: Player) -> i32 {
        self.current().scores[player.index()]
    }

    fn credit(&self, player: Player) -> i32 {
        self.current().credit[player.index()]
    }

    fn pits(&self) -> Pits {
        self.current().pits
    }

    fn turn_player(&self) -> Player {
        self.current().to_move
    }
}

/// A small sowing game: sow counter-clockwise around both rows, capture the
/// last pit (and the run of pits behind it) when it ends on 2, 4 or 6.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SowBoard {
    pits: Pits,
    scores: [i32; 2],
    credit: [i32; 2],
    to_move: Player,
    total: i32,
}

impl SowBoard {
    pub fn new(pits: Pits, to_move: Player) -> Self {
        let total = pits.iter().flatten().map(|&b| b as i32).sum();
        Self {
            pits,
            scores: [0, 0],
            credit: [0, 0],
            to_move,
            total,
        }
    }

    /// Six pits of `beans` on each side, first player to move
    pub fn uniform(beans: u32) -> Self {
        Self::new([[beans; PITS_PER_SIDE]; 2], Player::First)
    }

    pub fn with_scores(mut self, scores: [i32; 2]) -> Self {
        self.total += scores[0] + scores[1];
        self.scores = scores;
        self
    }

    pub fn with_credit(mut self, credit: [i32; 2]) -> Self {
        self.credit = credit;
        self
    }

    fn has_sowable_pit(&self) -> bool {
        self.pits[self.to_move.index()].iter().any(|&b| b > 0)
    }

    fn step(side: usize, pit: usize) -> (usize, usize) {
        if pit + 1 == PITS_PER_SIDE {
            (1 - side, 0)
        } else {
            (side, pit + 1)
        }
    }

    fn step_back(side: usize, pit: usize) -> (usize, usize) {
        if pit == 0 {
            (1 - side, PITS_PER_SIDE - 1)
        } else {
            (side, pit - 1)
        }
    }
}

impl Board for SowBoard {
    fn legal_moves(&self) -> Vec<Move> {
        let me = self.to_move.index();
        let mut moves: Vec<Move> = (0..PITS_PER_SIDE)
            .filter(|&pit| self.pits[me][pit] > 0)
            .map(Move::Sow)
            .collect();
        if self.credit[me] > 0 {
            moves.push(Move::Skip);
        }
        moves
    }

    fn apply(&mut self, mv: Move) {
        let me = self.to_move.index();
        match mv {
            Move::Skip => {
                self.credit[me] -= 1;
            }
            Move::Sow(origin) => {
                let mut beans = std::mem::take(&mut self.pits[me][origin]);
                let (mut side, mut pit) = (me, origin);
                while beans > 0 {
                    (side, pit) = Self::step(side, pit);
                    self.pits[side][pit] += 1;
                    beans -= 1;
                }
                for _ in 0..2 * PITS_PER_SIDE {
                    let count = self.pits[side][pit];
                    if !matches!(count, 2 | 4 | 6) {
                        break;
                    }
                    self.scores[me] += count as i32;
                    self.pits[side][pit] = 0;
                    (side, pit) = Self::step_back(side, pit);
                }
            }
        }
        self.to_move = self.to_move.opponent();
    }

    fn is_game_over(&self) -> bool {
        self.scores.iter().any(|&s| s * 2 > self.total) || !self.has_sowable_pit()
    }

    fn winner(&self) -> Option<Player> {
        if !self.is_game_over() {
            return None;
        }
        match self.scores[0].cmp(&self.scores[1]) {
            std::cmp::Ordering::Greater => Some(Player::First),
            std::cmp::Ordering::Less => Some(Player::Second),
            std::cmp::Ordering::Equal => None,
        }
    }

    fn score(&self, player: Player) -> i32 {
        self.scores[player.index()]
    }

    fn credit(&self, player: Player) -> i32 {
        self.credit[player.index()]
    }

    fn pits(&self) -> Pits {
        self.pits
    }

    fn turn_player(&self) -> Player {
        self.to_move
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sow_captures_run_of_even_pits() {
        // pit 5 holds two beans: they land in opponent pits 0 and 1
        let mut pits = [[0; PITS_PER_SIDE]; 2];
        pits[0][5] = 2;
        pits[0][0] = 1;
        pits[1][0] = 1;
        pits[1][1] = 1;
        let mut board = SowBoard::new(pits, Player::First);
        board.apply(Move::Sow(5));
        assert_eq!(board.score(Player::First), 4);
        assert_eq!(board.pits()[1][0], 0);
        assert_eq!(board.pits()[1][1], 0);
        assert_eq!(board.turn_player(), Player::Second);
    }

    #[test]
    fn test_skip_spends_credit() {
        let mut board = SowBoard::uniform(1).with_credit([1, 0]);
        assert!(board.legal_moves().contains(&Move::Skip));
        board.apply(Move::Skip);
        assert_eq!(board.credit(Player::First), 0);
        assert_eq!(board.turn_player(), Player::Second);
    }
}
