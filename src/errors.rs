//! Engine-wide error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors produced by the tournament engine.
///
/// Every mutating operation checks [`EngineError::TournamentClosed`] before
/// any other validation, so a closed tournament short-circuits everything
/// else. All variants render a stable, user-readable reason string.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Tournament not found
    #[error("Tournament not found: {0}")]
    TournamentNotFound(i64),

    /// Participant not found within the tournament
    #[error("Participant not found: {0}")]
    ParticipantNotFound(i64),

    /// Address record not found
    #[error("Address not found: {0}")]
    AddressNotFound(i64),

    /// Table not found in the round's draw
    #[error("Table {table_no} not found in round {round_no}")]
    TableNotFound { round_no: u32, table_no: u32 },

    /// Malformed caller input (non-positive numbers, out-of-range seat, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Address is already a participant of the tournament
    #[error("Address {address_id} is already a participant")]
    Duplicate { address_id: i64 },

    /// Configured participant cap reached
    #[error("Participant limit reached ({max})")]
    CapacityExceeded { max: u32 },

    /// Tournament has been closed; all structural mutation is frozen
    #[error("Tournament is closed (since {closed_at})")]
    TournamentClosed { closed_at: DateTime<Utc> },

    /// Target address is blocked and may not be used in a swap
    #[error("Address {address_id} is blocked and cannot be selected")]
    BlockedAddress { address_id: i64 },

    /// Swap target equals the participant's current address (informational)
    #[error("Address is already assigned to this participant")]
    SameAddress,

    /// Table points do not sum to zero
    #[error("Points at table {table_no} sum to {sum} (must be 0)")]
    NonZeroSum { table_no: u32, sum: i64 },

    /// Round has no draw yet
    #[error("Round {round_no} has not been drawn yet")]
    RoundNotDrawn { round_no: u32 },

    /// Rounds must be drawn in order, without skipping
    #[error("Round {round_no} cannot be drawn before round {missing}")]
    RoundOutOfSequence { round_no: u32, missing: u32 },

    /// Tournament has no drawn rounds to close over
    #[error("Tournament cannot be closed: no rounds have been drawn")]
    NoRoundsDrawn,

    /// Not every drawn seat has a recorded score
    #[error("Results are incomplete: {entered} of {expected} scores recorded")]
    ScoresIncomplete { entered: u64, expected: u64 },

    /// A multi-row write could not be applied as a unit and was rolled back
    #[error("Operation aborted before partial write: {0}")]
    PartialWriteAborted(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl EngineError {
    /// Get a client-safe error message that doesn't leak internals.
    ///
    /// Database errors are sanitized so SQL details never reach the
    /// operator-facing layer.
    pub fn client_message(&self) -> String {
        match self {
            EngineError::Database(_) => "Internal storage error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Whether the error is advisory rather than a hard failure.
    ///
    /// `SameAddress` reports a no-op swap; `NonZeroSum` flags a table whose
    /// entry can still be corrected. Callers surface these as information,
    /// not as aborts.
    pub fn is_advisory(&self) -> bool {
        matches!(
            self,
            EngineError::SameAddress | EngineError::NonZeroSum { .. }
        )
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_is_sanitized() {
        let err = EngineError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.client_message(), "Internal storage error");
    }

    #[test]
    fn test_domain_errors_keep_their_message() {
        let err = EngineError::NonZeroSum { table_no: 3, sum: 1 };
        assert_eq!(err.client_message(), "Points at table 3 sum to 1 (must be 0)");
        assert!(err.is_advisory());
    }

    #[test]
    fn test_closed_is_not_advisory() {
        let err = EngineError::TournamentClosed { closed_at: Utc::now() };
        assert!(!err.is_advisory());
    }
}
