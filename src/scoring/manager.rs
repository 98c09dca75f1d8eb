//! Scoring manager: loads committed snapshots and delegates to the pure
//! ranking engine.

use super::engine;
use super::models::{OverallStanding, RosterEntry, RoundStanding, ScoreRow, TableShape};
use crate::draw::models::validate_round_no;
use crate::errors::{EngineError, EngineResult};
use crate::tournament::manager::fetch_tournament;
use crate::tournament::models::TournamentId;
use sqlx::{PgPool, Row};
use std::sync::Arc;

/// Scoring manager
#[derive(Clone)]
pub struct ScoringManager {
    pool: Arc<PgPool>,
}

impl ScoringManager {
    /// Create a new scoring manager
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Rank one drawn round. Invalid and half-entered tables contribute
    /// nothing; the computation itself never fails over bad table data.
    pub async fn round_standings(
        &self,
        tournament_id: TournamentId,
        round_no: u32,
    ) -> EngineResult<Vec<RoundStanding>> {
        validate_round_no(round_no)?;
        fetch_tournament(self.pool.as_ref(), tournament_id).await?;

        let drawn: Option<i32> = sqlx::query(
            "SELECT round_no FROM tournament_rounds
             WHERE tournament_id = $1 AND round_no = $2",
        )
        .bind(tournament_id)
        .bind(round_no as i32)
        .fetch_optional(self.pool.as_ref())
        .await?
        .map(|r| r.get("round_no"));
        if drawn.is_none() {
            return Err(EngineError::RoundNotDrawn { round_no });
        }

        let roster = self.roster(tournament_id).await?;
        let shapes = self.table_shapes(tournament_id).await?;
        let scores = self.scores(tournament_id).await?;

        Ok(engine::round_standings(&roster, &shapes, &scores, round_no))
    }

    /// Rank the whole tournament across all drawn rounds.
    pub async fn overall_standings(
        &self,
        tournament_id: TournamentId,
    ) -> EngineResult<Vec<OverallStanding>> {
        fetch_tournament(self.pool.as_ref(), tournament_id).await?;

        let roster = self.roster(tournament_id).await?;
        let shapes = self.table_shapes(tournament_id).await?;
        let scores = self.scores(tournament_id).await?;

        Ok(engine::overall_standings(&roster, &shapes, &scores))
    }

    async fn roster(&self, tournament_id: TournamentId) -> EngineResult<Vec<RosterEntry>> {
        let rows = sqlx::query(
            "SELECT id, player_no, display_name FROM tournament_participants
             WHERE tournament_id = $1 ORDER BY player_no ASC",
        )
        .bind(tournament_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .iter()
            .map(|row| RosterEntry {
                participant_id: row.get("id"),
                player_no: row.get::<i32, _>("player_no") as u32,
                display_name: row.get("display_name"),
            })
            .collect())
    }

    async fn table_shapes(&self, tournament_id: TournamentId) -> EngineResult<Vec<TableShape>> {
        let rows = sqlx::query(
            "SELECT round_no, table_no, COUNT(*) AS seats FROM tournament_seats
             WHERE tournament_id = $1
             GROUP BY round_no, table_no
             ORDER BY round_no ASC, table_no ASC",
        )
        .bind(tournament_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .iter()
            .map(|row| TableShape {
                round_no: row.get::<i32, _>("round_no") as u32,
                table_no: row.get::<i32, _>("table_no") as u32,
                seats: row.get::<i64, _>("seats") as usize,
            })
            .collect())
    }

    async fn scores(&self, tournament_id: TournamentId) -> EngineResult<Vec<ScoreRow>> {
        let rows = sqlx::query(
            "SELECT participant_id, round_no, table_no, points, soli
             FROM tournament_scores
             WHERE tournament_id = $1",
        )
        .bind(tournament_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .iter()
            .map(|row| ScoreRow {
                participant_id: row.get("participant_id"),
                round_no: row.get::<i32, _>("round_no") as u32,
                table_no: row.get::<i32, _>("table_no") as u32,
                points: row.get("points"),
                soli: row.get("soli"),
            })
            .collect())
    }
}
