// Board interface - the seam between the search core and the rule engine
//
// The rules themselves (sowing, captures, game end) live behind the `Board`
// trait; everything in this crate only reads positions and applies moves to
// clones it owns.

use serde::{Deserialize, Serialize};

/// Pits on each side of the board
pub const PITS_PER_SIDE: usize = 6;

/// Total beans on a fresh board; beans in play never exceed this
pub const BEAN_CAP: i32 = 72;

/// Raw pit contents, indexed by `Player::index()`
pub type Pits = [[u32; PITS_PER_SIDE]; 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    First = 0,
    Second = 1,
}

pub const PLAYERS: [Player; 2] = [Player::First, Player::Second];

impl Player {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    pub fn from_index(index: usize) -> Option<Player> {
        PLAYERS.get(index).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Sow the beans of the given pit on the mover's side
    Sow(usize),
    /// Pass the turn, spending one banked credit
    Skip,
}

impl Move {
    pub fn is_skip(&self) -> bool {
        matches!(self, Move::Skip)
    }
}

/// A mutable game position owned by the rule engine.
///
/// Search only ever calls `apply` on clones it created itself.
pub trait Board: Clone {
    /// Legal moves for the player to move, in a stable order
    fn legal_moves(&self) -> Vec<Move>;

    /// Play `mv` for the player to move
    fn apply(&mut self, mv: Move);

    fn is_game_over(&self) -> bool;

    /// The winner of a finished game; `None` on a draw or while in progress
    fn winner(&self) -> Option<Player>;

    fn score(&self, player: Player) -> i32;

    fn credit(&self, player: Player) -> i32;

    fn pits(&self) -> Pits;

    fn turn_player(&self) -> Player;

    /// Beans still on the board, summed over one side
    fn beans_on_side(&self, player: Player) -> i32 {
        self.pits()[player.index()].iter().map(|&b| b as i32).sum()
    }

    /// Beans still on the board, both sides
    fn beans_in_play(&self) -> i32 {
        self.beans_on_side(Player::First) + self.beans_on_side(Player::Second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involution() {
        for player in PLAYERS {
            assert_ne!(player, player.opponent());
            assert_eq!(player, player.opponent().opponent());
        }
    }

    #[test]
    fn test_player_index_round_trip() {
        assert_eq!(Player::First.index(), 0);
        assert_eq!(Player::Second.index(), 1);
        assert_eq!(Player::from_index(1), Some(Player::Second));
        assert_eq!(Player::from_index(2), None);
    }

    #[test]
    fn test_move_serializes_as_tagged_variant() {
        let json = serde_json::to_string(&Move::Sow(3)).unwrap();
        assert_eq!(json, r#"{"Sow":3}"#);
        let skip: Move = serde_json::from_str(r#""Skip""#).unwrap();
        assert!(skip.is_skip());
    }
}
