use crate::display_format::DisplayFormat;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::num::NonZeroI8;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Red,
    Black,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(i8)]
pub enum PieceKind {
    King,
    Advisor,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Soldier,
}

/// A kind and a side packed into one signed byte: positive for red, negative
/// for black, so that `Option<Piece>` stays a single byte.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Piece {
    data: NonZeroI8,
}

impl Side {
    pub fn opponent(&self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }

    /// Row direction of a soldier's forward step.
    pub fn forward(&self) -> i8 {
        match self {
            Self::Red => -1,
            Self::Black => 1,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Red => "red",
            Self::Black => "black",
        })
    }
}

impl PieceKind {
    pub const ALL: [Self; 7] = [
        Self::King,
        Self::Advisor,
        Self::Elephant,
        Self::Horse,
        Self::Chariot,
        Self::Cannon,
        Self::Soldier,
    ];

    /// Material value used by the evaluation. The king dwarfs every other piece
    /// so that no exchange can ever be worth giving it up.
    pub fn value(&self) -> i32 {
        match self {
            Self::King => 10000,
            Self::Advisor => 20,
            Self::Elephant => 20,
            Self::Horse => 400,
            Self::Chariot => 1000,
            Self::Cannon => 450,
            Self::Soldier => 30,
        }
    }
}

impl Piece {
    pub fn new(kind: PieceKind, side: Side) -> Self {
        let Some(data) = NonZeroI8::new(kind as i8 + 1) else {
            unreachable!("kind discriminants start at zero")
        };
        let data = match side {
            Side::Red => data,
            Side::Black => -data,
        };
        Self { data }
    }

    pub fn from_fen_char(value: char) -> Option<Self> {
        let kind = match value.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'a' => PieceKind::Advisor,
            'e' | 'b' => PieceKind::Elephant,
            'h' | 'n' => PieceKind::Horse,
            'r' => PieceKind::Chariot,
            'c' => PieceKind::Cannon,
            'p' | 's' => PieceKind::Soldier,
            _ => return None,
        };

        let side = if value.is_ascii_uppercase() { Side::Red } else { Side::Black };
        Some(Self::new(kind, side))
    }

    pub fn side(&self) -> Side {
        if self.data.is_positive() { Side::Red } else { Side::Black }
    }

    pub fn kind(&self) -> PieceKind {
        PieceKind::ALL[(self.data.get().unsigned_abs() - 1) as usize]
    }

    pub fn is(&self, kind: PieceKind, side: Side) -> bool {
        *self == Self::new(kind, side)
    }

    pub fn fen_char(&self) -> char {
        let result = match self.kind() {
            PieceKind::King => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Elephant => 'e',
            PieceKind::Horse => 'h',
            PieceKind::Chariot => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        };
        match self.side() {
            Side::Red => result.to_ascii_uppercase(),
            Side::Black => result,
        }
    }

    pub fn chinese_char(&self) -> char {
        match (self.side(), self.kind()) {
            (Side::Red, PieceKind::King) => '帥',
            (Side::Red, PieceKind::Advisor) => '仕',
            (Side::Red, PieceKind::Elephant) => '相',
            (Side::Red, PieceKind::Horse) => '傌',
            (Side::Red, PieceKind::Chariot) => '俥',
            (Side::Red, PieceKind::Cannon) => '炮',
            (Side::Red, PieceKind::Soldier) => '兵',
            (Side::Black, PieceKind::King) => '將',
            (Side::Black, PieceKind::Advisor) => '士',
            (Side::Black, PieceKind::Elephant) => '象',
            (Side::Black, PieceKind::Horse) => '馬',
            (Side::Black, PieceKind::Chariot) => '車',
            (Side::Black, PieceKind::Cannon) => '砲',
            (Side::Black, PieceKind::Soldier) => '卒',
        }
    }

    /// The same kind belonging to the other side.
    pub fn swapped(&self) -> Self {
        Self { data: -self.data }
    }

    pub fn display(&self, format: DisplayFormat) -> impl Display + use<> {
        let s = if format.chinese {
            self.chinese_char().to_string()
        } else if format.concise {
            let c = self.fen_char();
            format!("{c}{c}")
        } else {
            format!("{} {:?}", self.side(), self.kind()).to_lowercase()
        };

        format.paint(self.side(), &s)
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display(DisplayFormat::string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_kind_and_side() {
        for kind in PieceKind::ALL {
            for side in [Side::Red, Side::Black] {
                let piece = Piece::new(kind, side);
                assert_eq!(piece.kind(), kind);
                assert_eq!(piece.side(), side);
                assert_eq!(Piece::from_fen_char(piece.fen_char()), Some(piece));
                assert_eq!(piece.swapped().side(), side.opponent());
                assert_eq!(piece.swapped().kind(), kind);
            }
        }
        assert_eq!(size_of::<Option<Piece>>(), 1);
    }

    #[test]
    fn display_outlives_the_piece() {
        let king = Piece::new(PieceKind::King, Side::Red).display(DisplayFormat::string());
        let soldier = Piece::new(PieceKind::Soldier, Side::Black).display(DisplayFormat::string());
        assert_eq!(format!("{king} {soldier}"), "KK pp");
    }

    #[test]
    fn king_outweighs_everything_else() {
        let others: i32 = PieceKind::ALL[1..].iter().map(|kind| kind.value()).sum();
        assert!(PieceKind::King.value() > 2 * others);
    }
}
