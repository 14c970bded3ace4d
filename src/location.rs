use crate::board::Board;
use crate::error::ParseMoveError;
use crate::piece::Side;
use std::fmt::Formatter;
use std::str::{Chars, FromStr};

/// A square on the board. Row 0 is black's back rank and row 9 is red's.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Location {
    row: i8,
    col: i8,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Move {
    pub from: Location,
    pub to: Location,
}

impl Location {
    pub fn new(row: i8, col: i8) -> Option<Self> {
        if !(0..Board::HEIGHT).contains(&row) || !(0..Board::WIDTH).contains(&col) {
            return None;
        }
        Some(Self { row, col })
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= Board::SIZE {
            return None;
        }
        let index = index as i8;
        Self::new(index / Board::WIDTH, index % Board::WIDTH)
    }

    pub fn from_chars(chars: &mut Chars<'_>) -> Option<Self> {
        let col = u8::try_from(chars.next()?).ok().filter(u8::is_ascii)?.to_ascii_lowercase();
        let row = u8::try_from(chars.next()?).ok().filter(u8::is_ascii)?;
        Self::new(row.wrapping_sub(b'0') as i8, col.wrapping_sub(b'a') as i8)
    }

    pub fn all() -> impl Iterator<Item = Self> + Clone {
        (0..Board::SIZE).filter_map(Self::from_index)
    }

    pub fn shift(&self, rows: i8, cols: i8) -> Option<Self> {
        Self::new(self.row + rows, self.col + cols)
    }

    pub fn index(&self) -> usize {
        (self.col + self.row * Board::WIDTH) as usize
    }

    pub fn row(&self) -> i8 {
        self.row
    }

    pub fn col(&self) -> i8 {
        self.col
    }

    /// Reflects the square across the river, swapping the two halves of the board.
    pub fn mirror(&self) -> Self {
        Self {
            row: Board::HEIGHT - self.row - 1,
            col: self.col,
        }
    }

    pub fn in_palace(&self, side: Side) -> bool {
        let rows = match side {
            Side::Red => 7..=9,
            Side::Black => 0..=2,
        };
        (3..=5).contains(&self.col) && rows.contains(&self.row)
    }

    /// Whether this square lies on the far side of the river as seen from `side`.
    pub fn across_river(&self, side: Side) -> bool {
        match side {
            Side::Red => self.row <= 4,
            Side::Black => self.row >= 5,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.col as u8) as char, self.row)
    }
}

impl FromStr for Location {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match Self::from_chars(&mut chars) {
            Some(location) if chars.next().is_none() => Ok(location),
            _ => Err(ParseMoveError(s.to_owned())),
        }
    }
}

impl Move {
    pub fn new(from: Location, to: Location) -> Self {
        Self { from, to }
    }

    pub fn mirror(&self) -> Self {
        Self::new(self.from.mirror(), self.to.mirror())
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        if let Some(from) = Location::from_chars(&mut chars)
            && let Some(to) = Location::from_chars(&mut chars)
            && chars.next().is_none()
        {
            Ok(Self { from, to })
        } else {
            Err(ParseMoveError(s.to_owned()))
        }
    }
}
