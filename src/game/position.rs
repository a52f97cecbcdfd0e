//! Provides the [`Position`]: whose turn it is and which cells each player
//! has claimed. Everything the search needs to know about the game (legal
//! moves, wins, terminal states) is answered here from two 9-bit sets.

use std::fmt;

use crate::error::Error;
use crate::game::bitboard::{Bitboard, LINES_THROUGH, WIN_LINES};
use crate::game::core::{Move, MoveList, Outcome, Player, BOARD_SIZE, BOARD_WIDTH};

/// State of the game. Positions are small `Copy` values and
/// [`Position::apply_move`] returns a new one, so sibling search nodes never
/// share a board.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    /// Cells claimed by each player, indexed by [`Player::index`]. The two
    /// sets never intersect.
    occupancy: [Bitboard; 2],
    side_to_move: Player,
}

impl Position {
    /// Empty board, [`Player::X`] to move.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            occupancy: [Bitboard::empty(); 2],
            side_to_move: Player::X,
        }
    }

    /// Creates a position from raw occupancy fields (bit `i` is cell `i`) and
    /// the side to move. No attempt is made to check whether the position is
    /// reachable through alternating play.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPosition`] if the fields overlap or use bits outside of
    /// the board.
    pub fn from_bits(x: u16, o: u16, side_to_move: Player) -> Result<Self, Error> {
        let board = Bitboard::full().bits();
        if x & o != 0 || (x | o) & !board != 0 {
            return Err(Error::InvalidPosition {
                first: x,
                second: o,
            });
        }
        Ok(Self {
            occupancy: [Bitboard::from_bits(x), Bitboard::from_bits(o)],
            side_to_move,
        })
    }

    /// Player who makes the next move.
    #[must_use]
    pub const fn us(&self) -> Player {
        self.side_to_move
    }

    /// Player who made the last move (or will move second if the board is
    /// empty).
    #[must_use]
    pub const fn they(&self) -> Player {
        self.side_to_move.opponent()
    }

    /// Cells claimed by `player`.
    #[must_use]
    pub const fn occupancy(&self, player: Player) -> Bitboard {
        self.occupancy[player.index()]
    }

    fn occupied_cells(&self) -> Bitboard {
        self.occupancy[0] | self.occupancy[1]
    }

    /// Cells nobody has claimed yet.
    #[must_use]
    pub fn free_cells(&self) -> Bitboard {
        !self.occupied_cells()
    }

    /// Returns true if `player` owns a complete line.
    #[must_use]
    pub fn has_line(&self, player: Player) -> bool {
        let cells = self.occupancy(player);
        WIN_LINES.iter().any(|&line| cells.is_superset(line))
    }

    /// Returns true if any player owns a complete line. Both players are
    /// checked independently.
    #[must_use]
    pub fn is_won(&self) -> bool {
        Player::ALL.into_iter().any(|player| self.has_line(player))
    }

    /// Returns true if `last_move`, made by [`Position::they`], completed a
    /// line. Only the lines through that cell are checked.
    #[must_use]
    pub fn is_won_by_last_move(&self, last_move: Move) -> bool {
        let cells = self.occupancy(self.they());
        cells.contains(last_move)
            && LINES_THROUGH[usize::from(last_move.index())]
                .iter()
                .any(|&line| !line.is_empty() && cells.is_superset(line))
    }

    /// Player owning a complete line, if any. [`Player::X`] is reported first
    /// for malformed positions where both sides have a line.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        Player::ALL.into_iter().find(|&player| self.has_line(player))
    }

    /// Calculates a list of free cells in board order. The list is not
    /// filtered for won positions: whether to keep playing is up to the
    /// caller, [`Position::is_terminal`] answers that.
    #[must_use]
    pub fn available_moves(&self) -> MoveList {
        self.free_cells().iter().collect()
    }

    /// Returns true if the board is full.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.occupied_cells() == Bitboard::full()
    }

    /// A position is terminal if someone has won or there are no free cells
    /// left.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.is_won() || self.is_full()
    }

    /// Result of the game if the position is terminal.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self.winner() {
            Some(player) => Some(Outcome::Win(player)),
            None if self.is_full() => Some(Outcome::Draw),
            None => None,
        }
    }

    /// Returns true if the cell is free.
    #[must_use]
    pub fn is_legal(&self, next_move: Move) -> bool {
        self.free_cells().contains(next_move)
    }

    /// Returns the position after [`Position::us`] claims the cell.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalMove`] if the cell is taken.
    pub fn apply_move(&self, next_move: Move) -> Result<Self, Error> {
        if !self.is_legal(next_move) {
            return Err(Error::IllegalMove {
                notation: next_move.to_string(),
            });
        }
        Ok(self.play(next_move))
    }

    /// Unchecked version of [`Position::apply_move`] for moves that come out of
    /// [`Position::available_moves`].
    #[must_use]
    pub(crate) fn play(&self, next_move: Move) -> Self {
        debug_assert!(self.is_legal(next_move), "{next_move} is not legal:\n{self}");
        let mut result = *self;
        result.occupancy[self.side_to_move.index()] |= Bitboard::from_move(next_move);
        result.side_to_move = self.they();
        result
    }

    /// Number of moves made so far.
    #[must_use]
    pub fn ply(&self) -> u32 {
        self.occupied_cells().count()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Position {
    /// Draws the board as three rows of `X`, `O` and `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_WIDTH {
            for column in 0..BOARD_WIDTH {
                let Some(cell) = Move::new(column, row) else {
                    continue;
                };
                let symbol = if self.occupancy(Player::X).contains(cell) {
                    'X'
                } else if self.occupancy(Player::O).contains(cell) {
                    'O'
                } else {
                    '.'
                };
                write!(f, "{symbol}")?;
            }
            if row + 1 < BOARD_WIDTH {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")?;
        write!(f, "{} to move, ply {}/{BOARD_SIZE}", self.us(), self.ply())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn cell(column: u8, row: u8) -> Move {
        Move::new(column, row).unwrap()
    }

    #[test]
    fn empty_board() {
        let position = Position::empty();
        assert_eq!(position.us(), Player::X);
        assert!(!position.is_won());
        assert!(!position.is_terminal());
        assert_eq!(position.available_moves().len(), 9);
        assert_eq!(position.outcome(), None);
        assert_eq!(position.to_string(), "...\n...\n...");
    }

    #[test]
    fn apply_move_is_pure() {
        let position = Position::empty();
        let next = position.apply_move(cell(1, 1)).unwrap();
        assert_eq!(position, Position::empty());
        assert_eq!(next.us(), Player::O);
        assert!(next.occupancy(Player::X).contains(cell(1, 1)));
        assert_eq!(next.to_string(), "...\n.X.\n...");
        let next = next.apply_move(cell(2, 0)).unwrap();
        assert_eq!(next.to_string(), "..O\n.X.\n...");
        assert_eq!(next.us(), Player::X);
        assert_eq!(next.ply(), 2);
    }

    #[test]
    fn illegal_moves() {
        let position = Position::empty().apply_move(cell(0, 0)).unwrap();
        assert_eq!(
            position.apply_move(cell(0, 0)),
            Err(Error::IllegalMove {
                notation: "0 0".to_string()
            })
        );
        assert!(matches!(
            position.apply_move(cell(1, 0)).unwrap().apply_move(cell(1, 0)),
            Err(Error::IllegalMove { .. })
        ));
    }

    #[test]
    fn invalid_positions() {
        assert!(Position::from_bits(0b1, 0b1, Player::X).is_err());
        assert!(Position::from_bits(1 << 9, 0, Player::X).is_err());
        assert!(Position::from_bits(0b101, 0b010, Player::X).is_ok());
    }

    #[test]
    fn win_by_last_move_matches_full_check() {
        // X completes the anti-diagonal with the center.
        let position = Position::from_bits(0b001_000_100, 0b000_001_011, Player::X).unwrap();
        let next = position.apply_move(cell(1, 1)).unwrap();
        assert!(next.is_won_by_last_move(cell(1, 1)));
        assert!(next.is_won());
        assert_eq!(next.winner(), Some(Player::X));
        // A move elsewhere does not complete anything.
        let next = position.apply_move(cell(2, 1)).unwrap();
        assert!(!next.is_won_by_last_move(cell(2, 1)));
        assert!(!next.is_won());
    }

    #[test]
    fn debug_dump() {
        let position = Position::from_bits(0b000_010_001, 0b000_000_100, Player::O).unwrap();
        assert_eq!(format!("{position:?}"), "X.O\n.X.\n...\nO to move, ply 3/9");
    }
}
