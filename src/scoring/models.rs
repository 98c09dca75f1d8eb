//! Scoring data models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::registry::models::ParticipantId;

/// One participant as the ranking engine sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub participant_id: ParticipantId,
    pub player_no: u32,
    pub display_name: String,
}

/// One drawn table's identity and size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableShape {
    pub round_no: u32,
    pub table_no: u32,
    /// Seats in the draw; the remainder table has fewer than 4
    pub seats: usize,
}

/// One committed score row
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreRow {
    pub participant_id: ParticipantId,
    pub round_no: u32,
    pub table_no: u32,
    pub points: i64,
    pub soli: i64,
}

/// One row of a round ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStanding {
    /// Competition place: ties share a place, the next place skips
    pub place: u32,
    pub participant_id: ParticipantId,
    pub player_no: u32,
    pub display_name: String,
    /// Table the result was scored at
    pub table_no: u32,
    pub points: i64,
    pub soli: i64,
}

/// One row of the overall ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallStanding {
    /// Competition place among scored participants; participants without a
    /// single valid round all share the place after the last scored one
    pub place: u32,
    pub participant_id: ParticipantId,
    pub player_no: u32,
    pub display_name: String,
    /// Sum of points over the participant's valid rounds
    pub total_points: i64,
    /// Sum of soli over the participant's valid rounds
    pub total_soli: i64,
    /// Rounds that counted
    pub rounds_counted: u32,
    /// Per-round breakdown, round number to (points, soli)
    pub per_round: BTreeMap<u32, (i64, i64)>,
}
