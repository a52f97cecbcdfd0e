//! Tic-tac-toe primitives commonly used within [`crate::game`].

use std::fmt;
use std::ops::Not;

use arrayvec::ArrayVec;
use itertools::Itertools;

use crate::error::Error;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 3;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// "No move yet" in the external notation. Sent by the other side when we
/// are the one to open the game.
pub const NO_MOVE: &str = "-1 -1";

/// Placing a mark on one of the 9 cells. Cells are numbered row by row from
/// the top-left corner, see [`crate::game::bitboard::Bitboard`].
///
/// Externally a move is written as "column row", both 0-indexed, and
/// [`Move::from_notation`] and the [`fmt::Display`] implementation are the two
/// directions of that mapping.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    index: u8,
}

impl Move {
    /// Creates a move from the cell index. Returns [`None`] outside of
    /// `0..BOARD_SIZE`.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < BOARD_SIZE {
            Some(Self { index })
        } else {
            None
        }
    }

    /// Creates a move from its column and row.
    #[must_use]
    pub const fn new(column: u8, row: u8) -> Option<Self> {
        if column < BOARD_WIDTH && row < BOARD_WIDTH {
            Some(Self {
                index: row * BOARD_WIDTH + column,
            })
        } else {
            None
        }
    }

    /// Cell index in `0..BOARD_SIZE`.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.index
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn column(self) -> u8 {
        self.index % BOARD_WIDTH
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn row(self) -> u8 {
        self.index / BOARD_WIDTH
    }

    /// Parses "column row" notation. The "-1 -1" sentinel yields `Ok(None)`.
    ///
    /// ```
    /// use oxo::game::core::Move;
    ///
    /// assert_eq!(Move::from_notation("1 2").unwrap(), Move::new(1, 2));
    /// assert_eq!(Move::from_notation("-1 -1").unwrap(), None);
    /// assert!(Move::from_notation("3 0").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNotation`] when the input is neither two integers within
    /// the board nor the sentinel.
    pub fn from_notation(input: &str) -> Result<Option<Self>, Error> {
        let input = input.trim();
        let invalid = || Error::InvalidNotation {
            input: input.to_string(),
        };
        let (column, row) = input
            .split_whitespace()
            .collect_tuple()
            .ok_or_else(invalid)?;
        let column: i8 = column.parse().map_err(|_| invalid())?;
        let row: i8 = row.parse().map_err(|_| invalid())?;
        match (column, row) {
            (-1, -1) => Ok(None),
            (column, row) => {
                let column = u8::try_from(column).map_err(|_| invalid())?;
                let row = u8::try_from(row).map_err(|_| invalid())?;
                Self::new(column, row).map(Some).ok_or_else(invalid)
            },
        }
    }

    /// Serializes an optional move, writing the sentinel for [`None`].
    #[must_use]
    pub fn to_notation(cell: Option<Self>) -> String {
        cell.map_or_else(|| NO_MOVE.to_string(), |cell| cell.to_string())
    }
}

impl fmt::Display for Move {
    /// Serializes a move as "column row".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column(), self.row())
    }
}

impl TryFrom<&str> for Move {
    type Error = Error;

    /// Strict version of [`Move::from_notation`] that rejects the sentinel.
    fn try_from(input: &str) -> Result<Self, Error> {
        Self::from_notation(input)?.ok_or_else(|| Error::InvalidNotation {
            input: input.trim().to_string(),
        })
    }
}

/// Legal moves of a single position never exceed the number of cells, so they
/// live on the stack.
pub type MoveList = ArrayVec<Move, { BOARD_SIZE as usize }>;

/// The two sides. [`Player::X`] always opens the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    #[allow(missing_docs)]
    X,
    #[allow(missing_docs)]
    O,
}

impl Player {
    /// Both players in the order of their occupancy fields.
    pub const ALL: [Self; 2] = [Self::X, Self::O];

    /// Index of the player's occupancy field.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::O => 1,
        }
    }

    /// "Flips" the side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::X => 'X',
                Self::O => 'O',
            }
        )
    }
}

/// How a finished game (or a finished playout) ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    #[allow(missing_docs)]
    Win(Player),
    #[allow(missing_docs)]
    Draw,
}

impl Outcome {
    /// The winning side, if there is one.
    #[must_use]
    pub const fn winner(self) -> Option<Player> {
        match self {
            Self::Win(player) => Some(player),
            Self::Draw => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win(player) => write!(f, "Game is won by {player}"),
            Self::Draw => write!(f, "Game is drawn"),
        }
    }
}
