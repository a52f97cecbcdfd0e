//! Errors reported by the board and the search controller.
//!
//! The binary wraps these into [`anyhow::Error`] when talking to the outside
//! world, the library keeps them typed so that callers can tell a protocol
//! violation apart from a finished game.

use thiserror::Error;

/// Everything that can go wrong when feeding moves and positions into the
/// engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The move refers to a cell that is already occupied.
    #[error("illegal move {notation}: the cell is already occupied")]
    IllegalMove {
        /// The offending move in "column row" notation.
        notation: String,
    },
    /// The input is neither one of the 9 cells nor the "-1 -1" sentinel.
    #[error("invalid move notation '{input}': expected \"column row\" with both in 0..=2 or \"-1 -1\"")]
    InvalidNotation {
        /// Raw input, trimmed.
        input: String,
    },
    /// The "-1 -1" sentinel arrived after moves have already been made.
    #[error("missing move: \"-1 -1\" is only valid before the first move, the game is at ply {ply}")]
    MissingMove {
        /// Number of moves already on the board.
        ply: u32,
    },
    /// Raw occupancy fields overlap or have bits outside of the 3x3 board.
    #[error("invalid position: occupancy {first:#011b} and {second:#011b} are not disjoint 9-bit sets")]
    InvalidPosition {
        /// Cells claimed by the first player.
        first: u16,
        /// Cells claimed by the second player.
        second: u16,
    },
    /// Search was requested at a position that is already won or full.
    #[error("the game is over, there is no move to search for")]
    GameOver,
}
