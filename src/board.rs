use crate::display_format::DisplayFormat;
use crate::location::{Location, Move};
use crate::piece::{Piece, PieceKind, Side};
use std::fmt::{Display, Formatter};
use std::ops::{Index, IndexMut};

/// Ten rows of nine cells. Pure storage: the movement rules live in `rules`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    pieces: [Option<Piece>; Board::SIZE],
}

impl Board {
    pub const WIDTH: i8 = 9;
    pub const HEIGHT: i8 = 10;
    pub const SIZE: usize = (Self::WIDTH * Self::HEIGHT) as usize;

    pub const OPENING: &'static str = "rheakaehr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RHEAKAEHR";

    pub fn new() -> Self {
        Self { pieces: [None; Self::SIZE] }
    }

    /// Parses the placement part of a board text, rank 0 (black's back rank)
    /// first. Anything after the first space is ignored.
    pub fn from_fen(fen: &str) -> Option<Self> {
        let mut board = Self::new();
        let mut row = 0;
        let mut col = 0;

        for current in fen.trim().chars() {
            match current {
                ' ' => break,
                '/' => {
                    if col != Self::WIDTH {
                        return None;
                    }
                    col = 0;
                    row += 1;
                    if row >= Self::HEIGHT {
                        return None;
                    }
                }
                '1'..='9' => {
                    col += current.to_digit(10)? as i8;
                    if col > Self::WIDTH {
                        return None;
                    }
                }
                _ => {
                    let piece = Piece::from_fen_char(current)?;
                    board[Location::new(row, col)?] = Some(piece);
                    col += 1;
                }
            }
        }

        if row != Self::HEIGHT - 1 || col != Self::WIDTH {
            return None;
        }

        Some(board)
    }

    pub fn opening() -> Self {
        match Self::from_fen(Self::OPENING) {
            Some(board) => board,
            None => unreachable!("opening position is well formed"),
        }
    }

    pub fn fen(&self) -> String {
        let mut result = String::new();
        for row in 0..Self::HEIGHT {
            if row > 0 {
                result.push('/');
            }

            let mut empty = 0;
            for col in 0..Self::WIDTH {
                match Location::new(row, col).and_then(|location| self[location]) {
                    Some(piece) => {
                        if empty > 0 {
                            result.push_str(&empty.to_string());
                            empty = 0;
                        }
                        result.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }

            if empty > 0 {
                result.push_str(&empty.to_string());
            }
        }
        result
    }

    /// Moves the piece at `mv.from` onto `mv.to` and returns whatever stood there.
    /// No rule is checked; `undo` with the returned capture reverts it exactly.
    pub fn play(&mut self, mv: Move) -> Option<Piece> {
        let piece = self[mv.from].take();
        std::mem::replace(&mut self[mv.to], piece)
    }

    pub fn undo(&mut self, mv: Move, capture: Option<Piece>) {
        self[mv.from] = self[mv.to];
        self[mv.to] = capture;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Location, Piece)> + '_ {
        Location::all().filter_map(|location| self[location].map(|piece| (location, piece)))
    }

    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Location, Piece)> + '_ {
        self.iter().filter(move |(_, piece)| piece.side() == side)
    }

    pub fn find_king(&self, side: Side) -> Option<Location> {
        let king = Piece::new(PieceKind::King, side);
        self.iter().find(|&(_, piece)| piece == king).map(|(location, _)| location)
    }

    pub fn count(&self, kind: PieceKind, side: Side) -> usize {
        self.iter().filter(|(_, piece)| piece.is(kind, side)).count()
    }

    /// Number of pieces strictly between two squares on the same row or
    /// column. Squares that do not share a line have nothing between them.
    pub fn count_between(&self, a: Location, b: Location) -> usize {
        let between = |from: i8, to: i8| (from.min(to) + 1)..from.max(to);
        if a.row() == b.row() {
            between(a.col(), b.col())
                .filter_map(|col| Location::new(a.row(), col))
                .filter(|&location| self[location].is_some())
                .count()
        } else if a.col() == b.col() {
            between(a.row(), b.row())
                .filter_map(|row| Location::new(row, a.col()))
                .filter(|&location| self[location].is_some())
                .count()
        } else {
            0
        }
    }

    /// The same position with the sides swapped and the board reflected
    /// across the river.
    pub fn mirror(&self) -> Self {
        let mut board = Self::new();
        for (location, piece) in self.iter() {
            board[location.mirror()] = Some(piece.swapped());
        }
        board
    }

    pub fn display(&self, format: DisplayFormat) -> impl Display + '_ {
        struct Impl<'a>(&'a Board, DisplayFormat);
        return Impl(self, format);

        impl Display for Impl<'_> {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                let &Self(board, format) = self;
                for row in 0..Board::HEIGHT {
                    write!(f, "{row}")?;
                    for location in (0..Board::WIDTH).filter_map(|col| Location::new(row, col)) {
                        match board[location] {
                            Some(piece) => write!(f, " {}", piece.display(format.with_concise(true)))?,
                            None => write!(f, "   ")?,
                        }
                    }
                    writeln!(f)?;
                }
                for char in 'a'..='i' {
                    write!(f, "  {char}")?;
                }
                writeln!(f)
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<Location> for Board {
    type Output = Option<Piece>;
    fn index(&self, index: Location) -> &Self::Output {
        &self.pieces[index.index()]
    }
}

impl IndexMut<Location> for Board {
    fn index_mut(&mut self, index: Location) -> &mut Self::Output {
        &mut self.pieces[index.index()]
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display(DisplayFormat::string()))
    }
}
