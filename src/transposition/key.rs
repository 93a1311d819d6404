use std::fmt;

use itertools::Itertools;

use crate::board::{Board, Pits, Player, PITS_PER_SIDE, PLAYERS};
use crate::errors::{SearchError, SearchOutcome};

/// Digits per field in the textual key
const FIELD_WIDTH: usize = 3;

/// Canonical key of a position: every pit count of both sides, both
/// players' scores and credits, and the player to move. Equal keys mean
/// equal positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey {
    pits: [[u8; PITS_PER_SIDE]; 2],
    scores: [u8; 2],
    credit: [u8; 2],
    to_move: Player,
}

fn pack_tally(values: [i32; 2]) -> SearchOutcome<[u8; 2]> {
    let mut packed = [0u8; 2];
    for player in PLAYERS {
        let value = values[player.index()];
        packed[player.index()] =
            u8::try_from(value).map_err(|_| SearchError::TallyOverflow { player, value })?;
    }
    Ok(packed)
}

impl PositionKey {
    /// Length of `encode()`, whatever the position
    pub const ENCODED_LEN: usize = (2 * PITS_PER_SIDE + 4) * FIELD_WIDTH + 1;

    /// Key of a bare pit layout, with no scores or credit
    pub fn new(pits: &Pits, to_move: Player) -> SearchOutcome<Self> {
        let mut packed = [[0u8; PITS_PER_SIDE]; 2];
        for player in PLAYERS {
            for (pit, &count) in pits[player.index()].iter().enumerate() {
                packed[player.index()][pit] = u8::try_from(count)
                    .map_err(|_| SearchError::PitOverflow { player, pit, count })?;
            }
        }
        Ok(PositionKey {
            pits: packed,
            scores: [0; 2],
            credit: [0; 2],
            to_move,
        })
    }

    pub fn with_tally(mut self, scores: [i32; 2], credit: [i32; 2]) -> SearchOutcome<Self> {
        self.scores = pack_tally(scores)?;
        self.credit = pack_tally(credit)?;
        Ok(self)
    }

    pub fn of<B: Board>(board: &B) -> SearchOutcome<Self> {
        let scores = PLAYERS.map(|player| board.score(player));
        let credit = PLAYERS.map(|player| board.credit(player));
        Self::new(&board.pits(), board.turn_player())?.with_tally(scores, credit)
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Fixed-width text form: three zero-padded digits per field, first
    /// player's pits then second's, then scores and credits, then the
    /// turn index.
    pub fn encode(&self) -> String {
        let fields = self
            .pits
            .iter()
            .flatten()
            .chain(self.scores.iter())
            .chain(self.credit.iter())
            .map(|value| format!("{value:0width$}", width = FIELD_WIDTH))
            .join("");
        format!("{fields}{}", self.to_move.index())
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
