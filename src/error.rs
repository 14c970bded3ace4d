//! Error types for the parts of the engine that can fail for reasons other
//! than an illegal move. Rule violations are never errors: they are reported
//! as rejected moves.

use crate::location::Move;
use crate::piece::Side;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid square or move '{0}'")]
pub struct ParseMoveError(pub String);

/// Reasons a saved [`Snapshot`](crate::snapshot::Snapshot) cannot be turned back into a game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("invalid board text '{0}'")]
    InvalidBoard(String),

    #[error("board must hold exactly one {0} king")]
    KingCount(Side),

    #[error("{0} is in check although it is not to move")]
    WaitingSideInCheck(Side),

    #[error("invalid history entry {index}: {reason}")]
    InvalidHistory { index: usize, reason: String },

    #[error("saved outcome does not match the position")]
    OutcomeMismatch,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("illegal move {0}")]
    IllegalMove(Move),

    #[error("the game is already over")]
    GameOver,

    #[error("it is the computer's turn")]
    ComputerToMove,

    #[error("it is a human player's turn")]
    HumanToMove,

    #[error("nothing to undo")]
    NothingToUndo,

    /// The search found no move although the game was not over, which means
    /// the outcome bookkeeping and the move generator disagree.
    #[error("computer playing {0} found no reply in a live game")]
    NoReply(Side),
}
