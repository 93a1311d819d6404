// Players module - the agents a game harness can drive
//
// A harness only sees `BotPlayer`: it hands over the current position and
// gets back the move to play.

use crate::board::{Board, Move};
use crate::errors::AgentResult;

pub mod search_player;

pub use self::search_player::SearchPlayer;

pub trait BotPlayer<B: Board> {
    /// Identifier the harness registers the agent under
    fn id(&self) -> &str;

    /// Pick a move for the player to move in `board`. The board is not modified.
    fn choose_move(&mut self, board: &B) -> AgentResult<Move>;
}
