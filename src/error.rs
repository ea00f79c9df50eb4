//! Error kinds shared by the rules engine, the solver and the JS boundary.
//!
//! Rule violations (`InvalidMove`, `InvalidBoard`, ...) and search outcomes (`NoSolution`,
//! `OutOfMoves`) are separate variants so callers can tell "that move was illegal" apart from
//! "the engine has nothing to play".

use thiserror::Error;

use crate::piece::{Color, Position};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KhetError {
    /// The move fails the legality check and was not applied.
    #[error("invalid move {notation}: {reason}")]
    InvalidMove {
        notation: String,
        reason: &'static str,
    },

    /// Malformed board description (dimensions, positions, orientations, occupancy).
    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("unknown piece kind: {0}")]
    UnknownPieceKind(String),

    /// Move text that is not of the form `x,y,ACTION` or `PASS`.
    #[error("invalid move notation: {0}")]
    InvalidNotation(String),

    /// Forced-mate search exhausted its frontier or node budget.
    #[error("no solution found within the search horizon")]
    NoSolution,

    /// Interactive play has no continuation after expanding the current node.
    #[error("no further moves available")]
    OutOfMoves,

    #[error("it is {expected}'s turn to move")]
    OutOfTurn { expected: Color },

    #[error("no piece at {0}")]
    NoPieceAt(Position),

    #[error("the game is over, {winner} won")]
    GameOver { winner: Color },
}

impl KhetError {
    /// Stable identifier for the error kind, used at the wasm boundary.
    pub const fn code(&self) -> &'static str {
        match self {
            KhetError::InvalidMove { .. } => "invalid_move",
            KhetError::InvalidBoard(_) => "invalid_board",
            KhetError::UnknownPieceKind(_) => "unknown_piece_kind",
            KhetError::InvalidNotation(_) => "invalid_notation",
            KhetError::NoSolution => "no_solution",
            KhetError::OutOfMoves => "out_of_moves",
            KhetError::OutOfTurn { .. } => "out_of_turn",
            KhetError::NoPieceAt(_) => "no_piece",
            KhetError::GameOver { .. } => "game_over",
        }
    }

    /// True for conditions reported by the search rather than by the rules.
    pub const fn is_search_outcome(&self) -> bool {
        matches!(self, KhetError::NoSolution | KhetError::OutOfMoves)
    }
}

pub type KhetResult<T> = Result<T, KhetError>;
