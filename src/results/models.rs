//! Result capture data models and table validation.

use serde::{Deserialize, Serialize};

use crate::registry::models::ParticipantId;

/// One recorded seat outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatScore {
    /// Scored participant
    pub participant_id: ParticipantId,
    /// Participant number, for display
    pub player_no: u32,
    /// Cached display label, for display
    pub display_name: String,
    /// Table the score was entered at
    pub table_no: u32,
    /// Seat within the table
    pub seat: u8,
    /// Signed base points
    pub points: i64,
    /// Soli count (bonus declarations, secondary ranking key)
    pub soli: i64,
}

/// One entry of a whole-table submission
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeatEntry {
    pub participant_id: ParticipantId,
    pub points: i64,
    pub soli: i64,
}

/// Advisory validation outcome for one table.
///
/// Validation never blocks partial entry; only aggregation treats invalid
/// tables as incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableValidation {
    /// All seats entered, points sum to zero
    Balanced,
    /// All seats entered but the sum is off by `sum`
    NonZeroSum { sum: i64 },
    /// Not every seat has a score yet
    Incomplete { entered: usize, expected: usize },
}

impl TableValidation {
    /// Whether the table's results may enter the standings.
    pub fn is_valid(&self) -> bool {
        matches!(self, TableValidation::Balanced)
    }
}

/// Validate a table's point entries against its expected seat count.
pub fn validate_points(points: &[i64], expected: usize) -> TableValidation {
    if points.len() < expected {
        return TableValidation::Incomplete {
            entered: points.len(),
            expected,
        };
    }
    let sum: i64 = points.iter().sum();
    if sum == 0 {
        TableValidation::Balanced
    } else {
        TableValidation::NonZeroSum { sum }
    }
}

/// Entry progress for one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundProgress {
    /// Tables in the round's draw
    pub total_tables: usize,
    /// Tables with every seat scored
    pub done_tables: usize,
    /// Scores recorded so far
    pub entered_scores: usize,
    /// One score per drawn seat
    pub expected_scores: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sum_table_is_balanced() {
        assert_eq!(validate_points(&[10, -3, -3, -4], 4), TableValidation::Balanced);
    }

    #[test]
    fn test_non_zero_sum_reports_delta() {
        assert_eq!(
            validate_points(&[10, -3, -3, -3], 4),
            TableValidation::NonZeroSum { sum: 1 }
        );
        assert_eq!(
            validate_points(&[-10, 3, 3, 3], 4),
            TableValidation::NonZeroSum { sum: -1 }
        );
    }

    #[test]
    fn test_partial_entry_is_incomplete_not_invalid() {
        assert_eq!(
            validate_points(&[10, -10], 4),
            TableValidation::Incomplete { entered: 2, expected: 4 }
        );
    }

    #[test]
    fn test_remainder_table_validates_against_its_own_size() {
        assert_eq!(validate_points(&[5, -5], 2), TableValidation::Balanced);
    }
}
