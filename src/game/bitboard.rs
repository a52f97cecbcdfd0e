//! [`Bitboard`]-based representation of the 3x3 grid. Each player's marks are a
//! set of cells packed into the low 9 bits of an integer, so win detection is a
//! handful of mask comparisons and the free cells are one `!(a | b)` away.
//!
//! The line geometry (rows, columns, diagonals) is computed at compile time
//! from the board width, along with the per-cell subset of lines passing
//! through each cell.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not, Sub};

use itertools::Itertools;

use crate::game::core::{Move, BOARD_SIZE, BOARD_WIDTH};

/// Represents a set of cells. Bit `i` corresponds to cell `i`, where cells are
/// numbered row by row starting from the top-left corner:
///
/// ```text
/// 0 1 2
/// 3 4 5
/// 6 7 8
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bitboard {
    bits: u16,
}

impl Bitboard {
    /// Bits that correspond to actual cells.
    const MASK: u16 = (1 << BOARD_SIZE) - 1;

    /// Constructs a bitboard from pre-calculated bits. Bits outside of the
    /// board are dropped.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self {
            bits: bits & Self::MASK,
        }
    }

    /// Set of no cells.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Set of all 9 cells.
    #[must_use]
    pub const fn full() -> Self {
        Self { bits: Self::MASK }
    }

    /// Returns raw bits.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.bits
    }

    /// Single-cell set.
    #[must_use]
    pub const fn from_move(cell: Move) -> Self {
        Self {
            bits: 1 << cell.index(),
        }
    }

    /// Collects cell indices into a set, ignoring indices outside of the board.
    #[must_use]
    pub fn from_cells(cells: &[u8]) -> Self {
        cells
            .iter()
            .filter(|&&cell| cell < BOARD_SIZE)
            .fold(Self::empty(), |acc, &cell| {
                acc | Self::from_bits(1 << cell)
            })
    }

    /// Returns true if this set contains given cell.
    #[must_use]
    pub const fn contains(self, cell: Move) -> bool {
        self.bits & (1 << cell.index()) != 0
    }

    /// Returns true if every cell of `other` is also in `self`.
    #[must_use]
    pub const fn is_superset(self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    /// Returns true if no cell is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Number of set cells.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    /// Iterates over the set cells in board order.
    #[must_use]
    pub const fn iter(self) -> BitboardIterator {
        BitboardIterator { bits: self.bits }
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = (0..BOARD_SIZE)
            .map(|cell| {
                if self.bits & (1 << cell) == 0 {
                    '.'
                } else {
                    '1'
                }
            })
            .chunks(usize::from(BOARD_WIDTH))
            .into_iter()
            .map(|row| row.collect::<String>())
            .join("\n");
        write!(f, "{rows}")
    }
}

impl BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits & rhs.bits,
        }
    }
}

impl Sub for Bitboard {
    type Output = Self;

    /// Relative complement, i.e. Result = LHS \ RHS.
    fn sub(self, rhs: Self) -> Self::Output {
        self & !rhs
    }
}

impl Not for Bitboard {
    type Output = Self;

    /// Complement within the 9 cells of the board.
    fn not(self) -> Self::Output {
        Self {
            bits: !self.bits & Self::MASK,
        }
    }
}

/// Iterates over set cells in a given [`Bitboard`] from the lowest index to the
/// highest.
pub struct BitboardIterator {
    bits: u16,
}

impl Iterator for BitboardIterator {
    type Item = Move;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        // Bit index is always < 9 here, the cast cannot truncate.
        #[allow(clippy::cast_possible_truncation)]
        let next_index = self.bits.trailing_zeros() as u8;
        self.bits &= self.bits - 1;
        Move::from_index(next_index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits.count_ones() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitboardIterator {}

/// Number of winning lines: every row, every column and both diagonals.
pub const NUM_LINES: usize = 2 * BOARD_WIDTH as usize + 2;

/// Most lines any single cell belongs to (the center: row, column and both
/// diagonals).
const MAX_LINES_PER_CELL: usize = 4;

/// All winning lines, rows first, then columns, then the main diagonal and the
/// anti-diagonal.
pub const WIN_LINES: [Bitboard; NUM_LINES] = compute_lines();

/// Lines passing through each cell, padded with empty sets. An empty set is
/// never a winning line so the padding can be checked without special-casing.
pub(crate) const LINES_THROUGH: [[Bitboard; MAX_LINES_PER_CELL]; BOARD_SIZE as usize] =
    compute_lines_through();

const fn compute_lines() -> [Bitboard; NUM_LINES] {
    let width = BOARD_WIDTH as usize;
    let mut rows = [0u16; NUM_LINES];
    let mut i = 0;
    while i < width {
        let mut j = 0;
        while j < width {
            // Row i, then column i.
            rows[i] |= 1 << (i * width + j);
            rows[width + i] |= 1 << (j * width + i);
            j += 1;
        }
        rows[2 * width] |= 1 << (i * width + i);
        rows[2 * width + 1] |= 1 << (i * width + (width - 1 - i));
        i += 1;
    }
    let mut lines = [Bitboard::empty(); NUM_LINES];
    let mut k = 0;
    while k < NUM_LINES {
        lines[k] = Bitboard::from_bits(rows[k]);
        k += 1;
    }
    lines
}

const fn compute_lines_through() -> [[Bitboard; MAX_LINES_PER_CELL]; BOARD_SIZE as usize] {
    let lines = compute_lines();
    let mut result = [[Bitboard::empty(); MAX_LINES_PER_CELL]; BOARD_SIZE as usize];
    let mut cell = 0;
    while cell < BOARD_SIZE as usize {
        let mut found = 0;
        let mut k = 0;
        while k < NUM_LINES {
            if lines[k].bits & (1 << cell) != 0 {
                result[cell][found] = lines[k];
                found += 1;
            }
            k += 1;
        }
        cell += 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn basics() {
        assert_eq!(std::mem::size_of::<Bitboard>(), 2);
        assert_eq!(Bitboard::full().bits(), 0b1_1111_1111);
        assert_eq!(Bitboard::empty().bits(), 0);
        assert_eq!(Bitboard::from_bits(u16::MAX), Bitboard::full());
        assert_eq!(!Bitboard::empty(), Bitboard::full());
        assert_eq!(!Bitboard::full(), Bitboard::empty());
        assert_eq!(
            Bitboard::from_cells(&[0, 4, 8]) - Bitboard::from_cells(&[4]),
            Bitboard::from_cells(&[0, 8])
        );
    }

    #[test]
    fn iteration() {
        let cells: Vec<u8> = Bitboard::from_cells(&[8, 1, 5])
            .iter()
            .map(Move::index)
            .collect();
        assert_eq!(cells, vec![1, 5, 8]);
        assert_eq!(Bitboard::full().iter().len(), 9);
        assert_eq!(Bitboard::empty().iter().next(), None);
    }

    #[test]
    fn lines() {
        assert_eq!(
            WIN_LINES.map(Bitboard::bits),
            [
                0b000_000_111,
                0b000_111_000,
                0b111_000_000,
                0b001_001_001,
                0b010_010_010,
                0b100_100_100,
                0b100_010_001,
                0b001_010_100,
            ]
        );
        for line in WIN_LINES {
            assert_eq!(line.count(), 3);
        }
    }

    #[test]
    fn lines_through_cells() {
        let count = |cell: usize| {
            LINES_THROUGH[cell]
                .iter()
                .filter(|line| !line.is_empty())
                .count()
        };
        // Corners: row, column, one diagonal.
        for corner in [0, 2, 6, 8] {
            assert_eq!(count(corner), 3);
        }
        // Edges: row and column only.
        for edge in [1, 3, 5, 7] {
            assert_eq!(count(edge), 2);
        }
        assert_eq!(count(4), 4);
        for (cell, lines) in LINES_THROUGH.iter().enumerate() {
            for line in lines.iter().filter(|line| !line.is_empty()) {
                assert!(line.bits() & (1 << cell) != 0);
            }
        }
    }

    #[test]
    fn dump() {
        #[rustfmt::skip]
        assert_eq!(
            format!("{:?}", Bitboard::from_cells(&[0, 4, 8])),
            "1..\n\
             .1.\n\
             ..1"
        );
        #[rustfmt::skip]
        assert_eq!(
            format!("{:?}", WIN_LINES[5]),
            "..1\n\
             ..1\n\
             ..1"
        );
    }
}
