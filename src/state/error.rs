//! Error types.
//!
//! Commands never fail loudly: the dispatcher turns every [`Rejection`] into a
//! silent no-op. The enum still exists so that machines can say *why* a
//! transition was declined, which is what the logs and tests look at.
//!
//! [`SetupError`] and [`ConfigError`] are the only errors a caller actually has
//! to handle, and only when seeding a session.

use super::board::{Coord, Direction};
use super::piece::PieceKey;

/// Why a command or machine transition was declined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("it is not the local player's turn")]
    NotYourTurn,

    #[error("{0} does not belong to the turn owner")]
    NotTurnOwner(PieceKey),

    #[error("{0} has already acted this turn")]
    AlreadyActed(PieceKey),

    #[error("a piece is already staged")]
    StagingActive,

    #[error("no piece is staged")]
    NoStaging,

    #[error("{0} is not a card")]
    NotACard(PieceKey),

    #[error("a card revealed at turn start cannot be hidden again")]
    RevealedCard,

    #[error("stance cannot change after the piece has moved")]
    AlreadyMoved,

    #[error("{0} is not a legal destination")]
    IllegalDestination(Coord),

    #[error("{0} is outside the board")]
    OutOfBounds(Coord),

    #[error("command not valid in the current summoning phase")]
    WrongPhase,

    #[error("no summoning in progress")]
    NoSummoning,

    #[error("a summoning is in progress")]
    SummoningActive,

    #[error("{0} is not a legal summon target")]
    IllegalSummonTarget(Coord),

    #[error("hand index {index} out of range for a hand of {len}")]
    HandIndexOutOfRange { index: usize, len: usize },

    #[error("card {0} is not in the leader's hand")]
    CardNotInHand(u32),

    #[error("{0} not found")]
    PieceNotFound(PieceKey),

    #[error("{0} is already on the board")]
    DuplicatePiece(PieceKey),

    #[error("no leader at seat {0}")]
    LeaderNotFound(usize),

    #[error("nothing to select")]
    NothingSelected,

    #[error("{0} is already selected")]
    AlreadySelected(PieceKey),

    #[error("cursor cannot move {0:?}")]
    CursorBlocked(Direction),
}

/// Errors raised while seeding a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("board size must be odd and at most {max}, got {0}", max = super::board::MAX_BOARD_SIZE)]
    InvalidBoardSize(u32),

    #[error("summon radius must be at least 1, got {0}")]
    InvalidSummonRadius(i32),

    #[error("card id {0} is used by more than one card")]
    CardIdCollision(u32),

    #[error("tile at {0} lies outside the board")]
    TileOutOfBounds(Coord),

    #[error("two tiles share coordinate {0}")]
    DuplicateTile(Coord),

    #[error("duplicate piece {0}")]
    DuplicatePiece(PieceKey),

    #[error("no leader is flagged to move first")]
    NoFirstPlayer,

    #[error("{0} starts outside the board")]
    PieceOutOfBounds(PieceKey),
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] SetupError),
}

/// Error parsing a `"<kind>-<id>"` piece key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid piece key {0:?}")]
pub struct ParseKeyError(pub String);
