//! Tournament data models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};

/// Tournament ID type
pub type TournamentId = i64;

/// Number of seats at a full table
pub const TABLE_SIZE: usize = 4;

/// A tournament and its lifecycle state.
///
/// The `closed_at` timestamp is the one-way lifecycle flag: once set, every
/// structural mutation (participants, draws, results) is rejected. There is
/// no reopen operation in the engine's contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    /// Tournament ID
    pub id: TournamentId,
    /// Tournament title
    pub title: String,
    /// Event date
    pub event_date: NaiveDate,
    /// Start time as entered by the operator (e.g. "14:00")
    pub start_time: String,
    /// 10-character tournament marker (YYMMDD prefix + 4 chars), if set
    pub marker: Option<String>,
    /// Venue, if set
    pub location: Option<String>,
    /// Organizer, if set
    pub organizer: Option<String>,
    /// Free-form description
    pub description: Option<String>,
    /// Minimum number of participants (0 = no minimum)
    pub min_participants: u32,
    /// Maximum number of participants (0 = unlimited)
    pub max_participants: u32,
    /// Set when the tournament was closed; `None` while open
    pub closed_at: Option<DateTime<Utc>>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Whether the tournament has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }

    /// Reject the operation if the tournament is closed.
    ///
    /// Called first on every mutating path so the closed gate short-circuits
    /// all other validation.
    pub fn ensure_open(&self) -> EngineResult<()> {
        match self.closed_at {
            Some(closed_at) => Err(EngineError::TournamentClosed { closed_at }),
            None => Ok(()),
        }
    }

    /// Whether another participant fits under the configured cap.
    ///
    /// A cap of 0 means unlimited.
    pub fn has_capacity_for_another(&self, participant_count: usize) -> bool {
        self.max_participants == 0 || participant_count < self.max_participants as usize
    }
}

/// Payload for creating a tournament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTournament {
    /// Tournament title
    pub title: String,
    /// Event date
    pub event_date: NaiveDate,
    /// Start time
    pub start_time: String,
    /// Optional marker; validated against the event date when present
    pub marker: Option<String>,
    /// Venue
    pub location: Option<String>,
    /// Organizer
    pub organizer: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Minimum number of participants (0 = no minimum)
    pub min_participants: u32,
    /// Maximum number of participants (0 = unlimited)
    pub max_participants: u32,
}

impl NewTournament {
    /// Validate the payload at the engine boundary.
    pub fn validate(&self) -> EngineResult<()> {
        if self.title.trim().is_empty() {
            return Err(EngineError::InvalidArgument(
                "tournament title is required".to_string(),
            ));
        }
        if self.start_time.trim().is_empty() {
            return Err(EngineError::InvalidArgument(
                "tournament start time is required".to_string(),
            ));
        }
        if let Some(marker) = &self.marker {
            super::marker::validate_marker_for_event_date(marker, self.event_date)?;
        }
        Ok(())
    }
}

/// Participant/table counts for a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentCounts {
    /// Number of registered participants
    pub participants: usize,
    /// Number of full four-seat tables
    pub full_tables: usize,
    /// Participants left over after filling full tables (0..=3)
    pub remainder: usize,
}

impl TournamentCounts {
    /// Derive table counts from a participant count.
    pub fn from_participants(participants: usize) -> Self {
        Self {
            participants,
            full_tables: participants / TABLE_SIZE,
            remainder: participants % TABLE_SIZE,
        }
    }
}
