//! Draw data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};
use crate::registry::models::ParticipantId;
use crate::tournament::models::{TABLE_SIZE, TournamentId};

/// A drawn round.
///
/// The stored seed and attempt make every draw reproducible: the same
/// `(tournament, round, attempt)` always yields the same layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// Owning tournament
    pub tournament_id: TournamentId,
    /// Round index, starting at 1
    pub round_no: u32,
    /// Seed the layout was derived from
    pub draw_seed: i64,
    /// Draw attempt: 1 for the first draw, incremented on each redraw
    pub draw_attempt: u32,
    /// When the draw was written
    pub drawn_at: DateTime<Utc>,
}

/// One seat of a drawn round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatAssignment {
    /// Table number, starting at 1
    pub table_no: u32,
    /// Seat number within the table, 1..=4
    pub seat: u8,
    /// Seated participant
    pub participant_id: ParticipantId,
    /// Participant number, for display
    pub player_no: u32,
    /// Cached display label, for display
    pub display_name: String,
}

/// One table of a drawn round, seats ordered 1..=4
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDraw {
    /// Table number, starting at 1
    pub table_no: u32,
    /// Seats in seat order; only the remainder table has fewer than 4
    pub seats: Vec<SeatAssignment>,
}

/// The full table/seat assignment of one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundDraw {
    /// Round index
    pub round_no: u32,
    /// Draw attempt the layout belongs to
    pub draw_attempt: u32,
    /// Tables in table order
    pub tables: Vec<TableDraw>,
}

impl RoundDraw {
    /// Number of seated participants across all tables.
    pub fn seat_count(&self) -> usize {
        self.tables.iter().map(|t| t.seats.len()).sum()
    }
}

/// Validate a caller-supplied seat index.
pub fn validate_seat(seat: u8) -> EngineResult<()> {
    if seat == 0 || seat as usize > TABLE_SIZE {
        return Err(EngineError::InvalidArgument(format!(
            "seat must be between 1 and {TABLE_SIZE}, got {seat}"
        )));
    }
    Ok(())
}

/// Validate a caller-supplied round index.
pub fn validate_round_no(round_no: u32) -> EngineResult<()> {
    if round_no == 0 {
        return Err(EngineError::InvalidArgument(
            "round number must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_range() {
        assert!(validate_seat(0).is_err());
        assert!(validate_seat(1).is_ok());
        assert!(validate_seat(4).is_ok());
        assert!(validate_seat(5).is_err());
    }

    #[test]
    fn test_round_no_must_be_positive() {
        assert!(validate_round_no(0).is_err());
        assert!(validate_round_no(1).is_ok());
    }
}
