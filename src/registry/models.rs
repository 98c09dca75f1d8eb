//! Participant registry data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Participant ID type (tournament-scoped row id)
pub type ParticipantId = i64;

/// Address ID type (reference into the external address book)
pub type AddressId = i64;

/// A tournament participant.
///
/// `player_no` is unique within the tournament but intentionally
/// non-contiguous: removals leave gaps until an explicit renumber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Participant ID
    pub id: ParticipantId,
    /// Owning tournament
    pub tournament_id: i64,
    /// Sparse participant number (positive, unique per tournament)
    pub player_no: u32,
    /// Reference to the external address record
    pub address_id: AddressId,
    /// Cached display label, refreshed on swap/replace
    pub display_name: String,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

/// Minimal address payload for quick-add (create address + participant in one step)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAddress {
    /// Last name
    pub last_name: String,
    /// First name
    pub first_name: String,
    /// Town shown in the display label
    pub town: String,
}

impl NewAddress {
    /// Validate required fields.
    pub fn validate(&self) -> crate::errors::EngineResult<()> {
        if self.last_name.trim().is_empty()
            || self.first_name.trim().is_empty()
            || self.town.trim().is_empty()
        {
            return Err(crate::errors::EngineError::InvalidArgument(
                "last name, first name, and town are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of a swap operation.
///
/// A swap either trades addresses between two participants (when the target
/// address already belongs to someone in the tournament) or replaces the
/// participant's address in place. Player numbers never change either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapOutcome {
    /// Both participants exchanged their addresses and display labels
    Traded {
        participant_id: ParticipantId,
        other_participant_id: ParticipantId,
    },
    /// The participant's address was replaced in place
    Replaced {
        participant_id: ParticipantId,
        old_address_id: AddressId,
        new_address_id: AddressId,
    },
}

/// Build the cached display label: "Last, First · Town" (town omitted when empty).
pub fn display_label(last_name: &str, first_name: &str, town: &str) -> String {
    let town = town.trim();
    let base = format!("{}, {}", last_name.trim(), first_name.trim());
    if town.is_empty() {
        base
    } else {
        format!("{base} · {town}")
    }
}

/// Whether an address status blocks it as a swap target.
///
/// "blocked" and the legacy "gesperrt" are rejected; unknown statuses are
/// allowed.
pub fn is_blocked_status(status: Option<&str>) -> bool {
    status
        .map(|s| {
            let s = s.trim();
            s.eq_ignore_ascii_case("blocked") || s.eq_ignore_ascii_case("gesperrt")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label_with_town() {
        assert_eq!(display_label("Meier", "Hans", "Kiel"), "Meier, Hans · Kiel");
    }

    #[test]
    fn test_display_label_without_town() {
        assert_eq!(display_label("Meier", "Hans", "  "), "Meier, Hans");
    }

    #[test]
    fn test_blocked_status_detection() {
        assert!(is_blocked_status(Some("blocked")));
        assert!(is_blocked_status(Some(" BLOCKED ")));
        assert!(is_blocked_status(Some("gesperrt")));
        assert!(is_blocked_status(Some("Gesperrt")));
        assert!(!is_blocked_status(Some("active")));
        assert!(!is_blocked_status(Some("paused")));
        assert!(!is_blocked_status(None));
    }

    #[test]
    fn test_new_address_requires_all_fields() {
        let addr = NewAddress {
            last_name: "Meier".to_string(),
            first_name: "".to_string(),
            town: "Kiel".to_string(),
        };
        assert!(addr.validate().is_err());

        let addr = NewAddress {
            last_name: "Meier".to_string(),
            first_name: "Hans".to_string(),
            town: "Kiel".to_string(),
        };
        assert!(addr.validate().is_ok());
    }
}
