use crate::board::Board;
use crate::display_format::DisplayFormat;
use crate::location::{Location, Move};
use crate::piece::{Piece, PieceKind, Side};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Ply {
    pub mv: Move,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    side_to_move: Side,
    history: Vec<Ply>,
    outcome: Option<Outcome>,
}

/// How a finished game ended. A side left without a legal move loses whether
/// or not it is in check.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "by", content = "winner")]
pub enum Outcome {
    Checkmate(Side),
    Stalemate(Side),
}

impl Outcome {
    pub fn winner(&self) -> Side {
        match *self {
            Self::Checkmate(winner) | Self::Stalemate(winner) => winner,
        }
    }

    pub fn display(&self, format: DisplayFormat) -> impl Display + use<> {
        let winner = self.winner();
        let king = Piece::new(PieceKind::King, winner).display(format.with_concise(false));
        let loser = winner.opponent();
        match self {
            Self::Checkmate(_) => format!("{king} won by checkmating {loser}"),
            Self::Stalemate(_) => format!("{king} won as {loser} has no legal move"),
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display(DisplayFormat::string()))
    }
}

impl Game {
    /// Starts a game from an arbitrary position. Returns `None` unless each
    /// side has exactly one king and the side not to move is safe.
    pub fn new(board: Board, side_to_move: Side) -> Option<Self> {
        let one_king = |side| board.count(PieceKind::King, side) == 1;
        if !one_king(Side::Red) || !one_king(Side::Black) || !board.is_safe(side_to_move.opponent()) {
            return None;
        }

        let mut game = Self {
            board,
            side_to_move,
            history: Vec::new(),
            outcome: None,
        };
        game.outcome = game.compute_outcome();
        Some(game)
    }

    pub fn opening() -> Self {
        Self {
            board: Board::opening(),
            side_to_move: Side::Red,
            history: Vec::new(),
            outcome: None,
        }
    }

    pub fn from_fen(fen: &str, side_to_move: Side) -> Option<Self> {
        Self::new(Board::from_fen(fen)?, side_to_move)
    }

    pub fn fen(&self) -> (String, Side) {
        (self.board.fen(), self.side_to_move)
    }

    pub(crate) fn from_parts(board: Board, side_to_move: Side, history: Vec<Ply>, outcome: Option<Outcome>) -> Self {
        Self {
            board,
            side_to_move,
            history,
            outcome,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn history(&self) -> &[Ply] {
        &self.history
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn winner(&self) -> Option<Side> {
        self.outcome.map(|outcome| outcome.winner())
    }

    /// Plays a move for the side to move if every rule allows it. A rejected
    /// move leaves the game untouched.
    pub fn attempt_move(&mut self, from: Location, to: Location) -> bool {
        self.play(Move::new(from, to))
    }

    pub fn play(&mut self, mv: Move) -> bool {
        if self.is_over() {
            return false;
        }

        let Some(piece) = self.board[mv.from] else {
            return false;
        };

        if piece.side() != self.side_to_move || !self.board.is_pseudo_legal(mv) {
            return false;
        }

        let captured = self.board.play(mv);
        if !self.board.is_safe(self.side_to_move) {
            self.board.undo(mv, captured);
            return false;
        }

        self.history.push(Ply { mv, piece, captured });
        self.side_to_move = self.side_to_move.opponent();
        self.outcome = self.compute_outcome();
        true
    }

    /// Takes back the last ply, restoring any captured piece. A game that the
    /// ply had finished becomes live again.
    pub fn undo(&mut self) -> Option<Ply> {
        let ply = self.history.pop()?;
        self.board.undo(ply.mv, ply.captured);
        self.side_to_move = self.side_to_move.opponent();
        self.outcome = None;
        Some(ply)
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|ply| ply.mv)
    }

    pub fn moves(&self) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }
        self.board.clone().legal_moves(self.side_to_move)
    }

    pub fn moves_from(&self, from: Location) -> Vec<Move> {
        if self.is_over() || !self.board[from].is_some_and(|piece| piece.side() == self.side_to_move) {
            return Vec::new();
        }
        self.board.clone().legal_moves_from(from)
    }

    pub fn in_check(&self) -> bool {
        self.board.in_check(self.side_to_move)
    }

    fn compute_outcome(&mut self) -> Option<Outcome> {
        let side = self.side_to_move;
        if self.board.has_any_legal_move(side) {
            None
        } else if self.board.in_check(side) {
            Some(Outcome::Checkmate(side.opponent()))
        } else {
            Some(Outcome::Stalemate(side.opponent()))
        }
    }

    pub fn display(&self, format: DisplayFormat) -> impl Display + '_ {
        struct Impl<'a>(&'a Game, DisplayFormat);
        return Impl(self, format);

        impl Impl<'_> {
            fn format_row(&self, f: &mut Formatter<'_>, row: i8) -> std::fmt::Result {
                let &Self(game, format) = self;
                write!(f, "{row}")?;

                let last = game.last_move();
                for location in (0..Board::WIDTH).filter_map(|col| Location::new(row, col)) {
                    if let Some(piece) = game.board[location] {
                        let piece = piece.display(format.with_concise(true)).to_string();
                        if last.is_some_and(|mv| mv.to == location) {
                            write!(f, " {}", format.emphasise(&piece))?;
                        } else {
                            write!(f, " {piece}")?;
                        }
                    } else if last.is_some_and(|mv| mv.from == location) {
                        write!(f, " ╶╴")?;
                    } else {
                        write!(f, "   ")?;
                    }
                }

                Ok(())
            }

            fn format_captured(&self, f: &mut Formatter<'_>, line: usize) -> std::fmt::Result {
                const LINES: usize = Board::HEIGHT as usize + 1;
                const SLOTS: usize = 2;

                let &Self(game, format) = self;
                if !game.history.iter().any(|ply| ply.captured.is_some()) {
                    return Ok(());
                }

                write!(f, " │")?;
                for side in [Side::Red, Side::Black] {
                    let mut lost = game
                        .history
                        .iter()
                        .filter_map(|ply| ply.captured)
                        .filter(|piece| piece.side() == side)
                        .skip(line)
                        .step_by(LINES);

                    write!(f, " ")?;
                    for _ in 0..SLOTS {
                        match lost.next() {
                            Some(piece) => write!(f, " {}", piece.display(format.with_concise(true)))?,
                            None => write!(f, "   ")?,
                        }
                    }
                }

                Ok(())
            }
        }

        impl Display for Impl<'_> {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                let &Self(game, format) = self;
                write!(f, "{}", game.board.fen())?;

                if format.concise {
                    return write!(f, " {}", game.side_to_move);
                }

                writeln!(f)?;

                for row in 0..Board::HEIGHT {
                    self.format_row(f, row)?;
                    self.format_captured(f, row as usize)?;
                    writeln!(f)?;
                }

                for char in 'a'..='i' {
                    write!(f, "  {char}")?;
                }
                write!(f, " ")?;
                self.format_captured(f, Board::HEIGHT as usize)?;
                writeln!(f)?;

                if let Some(ply) = game.history.last() {
                    let piece = ply.piece.display(format.with_concise(true));
                    write!(f, "({}) {} {piece} - ", game.history.len(), ply.mv)?;
                }

                if let Some(outcome) = game.outcome {
                    write!(f, "{}", outcome.display(format))?;
                } else {
                    let king = Piece::new(PieceKind::King, game.side_to_move).display(format.with_concise(false));
                    let check = game.in_check();
                    write!(f, "{king} {} - ", if check { "in check" } else { "to play" })?;
                    write!(f, "{} legal moves", game.moves().len())?;
                }

                writeln!(f)
            }
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::opening()
    }
}

impl Display for Game {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display(DisplayFormat::string()))
    }
}
