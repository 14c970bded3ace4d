//! Plain, serializable picture of a game. Storage is left to the caller; the
//! engine only converts between a [`Game`] and a [`Snapshot`].

use crate::board::Board;
use crate::error::SnapshotError;
use crate::game::{Game, Outcome, Ply};
use crate::location::Move;
use crate::piece::{Piece, PieceKind, Side};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: String,
    pub side_to_move: Side,
    #[serde(default)]
    pub outcome: Option<Outcome>,
    #[serde(default)]
    pub history: Vec<PlyRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlyRecord {
    #[serde(rename = "move")]
    pub mv: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured: Option<char>,
}

impl From<&Ply> for PlyRecord {
    fn from(ply: &Ply) -> Self {
        Self {
            mv: ply.mv.to_string(),
            captured: ply.captured.map(|piece| piece.fen_char()),
        }
    }
}

impl Game {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board().fen(),
            side_to_move: self.side_to_move(),
            outcome: self.outcome(),
            history: self.history().iter().map(PlyRecord::from).collect(),
        }
    }

    /// Rebuilds a game from a snapshot, checking that the history can really
    /// be taken back from the saved board and that the saved outcome agrees
    /// with the position.
    pub fn restore(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        let board = Board::from_fen(&snapshot.board).ok_or_else(|| SnapshotError::InvalidBoard(snapshot.board.clone()))?;
        check_position(&board, snapshot.side_to_move)?;

        let history = replay_backwards(&board, snapshot.side_to_move, &snapshot.history)?;

        let Some(fresh) = Game::new(board.clone(), snapshot.side_to_move) else {
            return Err(SnapshotError::WaitingSideInCheck(snapshot.side_to_move.opponent()));
        };
        if fresh.outcome() != snapshot.outcome {
            return Err(SnapshotError::OutcomeMismatch);
        }

        Ok(Game::from_parts(board, snapshot.side_to_move, history, snapshot.outcome))
    }
}

fn check_position(board: &Board, side_to_move: Side) -> Result<(), SnapshotError> {
    for side in [Side::Red, Side::Black] {
        if board.count(PieceKind::King, side) != 1 {
            return Err(SnapshotError::KingCount(side));
        }
    }

    let waiting = side_to_move.opponent();
    if !board.is_safe(waiting) {
        return Err(SnapshotError::WaitingSideInCheck(waiting));
    }
    Ok(())
}

/// Takes every recorded ply back on a scratch board. Each one must have been
/// made by the side that alternates back from `side_to_move`, must have been
/// legal in the position it was played from, and every position on the way
/// must be a valid one.
fn replay_backwards(board: &Board, side_to_move: Side, records: &[PlyRecord]) -> Result<Vec<Ply>, SnapshotError> {
    let mut scratch = board.clone();
    let mut mover = side_to_move;
    let mut history = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate().rev() {
        let invalid = |reason: &str| SnapshotError::InvalidHistory {
            index,
            reason: reason.to_owned(),
        };

        mover = mover.opponent();

        let mv: Move = record.mv.parse().map_err(|_| invalid("unreadable move"))?;
        let captured = match record.captured {
            Some(c) => Some(Piece::from_fen_char(c).ok_or_else(|| invalid("unreadable captured piece"))?),
            None => None,
        };

        let Some(piece) = scratch[mv.to] else {
            return Err(invalid("destination is empty"));
        };
        if piece.side() != mover {
            return Err(invalid("piece on the destination belongs to the wrong side"));
        }
        if scratch[mv.from].is_some() {
            return Err(invalid("origin is occupied"));
        }
        if captured.is_some_and(|captured| captured.side() == mover || captured.kind() == PieceKind::King) {
            return Err(invalid("impossible capture"));
        }

        scratch.undo(mv, captured);
        if !scratch.is_legal(mv) || !scratch.is_safe(mover.opponent()) {
            return Err(invalid("move was not legal"));
        }

        history.push(Ply { mv, piece, captured });
    }

    history.reverse();
    Ok(history)
}
