//! Tournament error types.

use thiserror::Error;

use super::models::TournamentState;
use crate::game::entities::{Coins, ContestantId};

/// Tournament errors
///
/// Everything except `InvalidState` is a configuration error. They're all
/// raised before the first round, so a failed run never touches a balance.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum TournamentError {
    /// Another contestant already registered with this ID
    #[error("Duplicate contestant id: {0}")]
    DuplicateContestantId(ContestantId),

    /// Too few or too many contestants to start
    #[error("Invalid contestant count: need {min} to {max}, have {count}")]
    InvalidContestantCount {
        count: usize,
        min: usize,
        max: usize,
    },

    /// A run parameter is out of range
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A contestant can't cover the bet or the draw tax
    #[error("Insufficient funds for contestant {id}: balance {balance}, required {required}")]
    InsufficientFunds {
        id: ContestantId,
        balance: Coins,
        required: Coins,
    },

    #[error("Tournament not in correct state: expected {expected:?}, got {actual:?}")]
    InvalidState {
        expected: TournamentState,
        actual: TournamentState,
    },
}

impl TournamentError {
    /// Whether the error comes from how the tournament was set up, as
    /// opposed to calling an operation at the wrong time.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, TournamentError::InvalidState { .. })
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;
