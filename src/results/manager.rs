//! Result capture manager.
//!
//! Attaches per-seat outcomes to a drawn round and validates the zero-sum
//! closure rule per table. Validation is advisory: partial entry is always
//! allowed, and only aggregation treats unbalanced tables as incomplete.

use super::models::{RoundProgress, SeatEntry, SeatScore, TableValidation, validate_points};
use crate::draw::models::{validate_round_no, validate_seat};
use crate::errors::{EngineError, EngineResult};
use crate::registry::models::ParticipantId;
use crate::tournament::manager::fetch_tournament;
use crate::tournament::models::TournamentId;
use sqlx::{PgPool, Row};
use std::sync::Arc;

/// Result capture manager
#[derive(Clone)]
pub struct ResultsManager {
    pool: Arc<PgPool>,
}

impl ResultsManager {
    /// Create a new results manager
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Upsert one seat's outcome.
    ///
    /// The seat must exist in the round's draw. Results stay mutable until
    /// the tournament is closed.
    pub async fn submit_seat_result(
        &self,
        tournament_id: TournamentId,
        round_no: u32,
        table_no: u32,
        seat: u8,
        points: i64,
        soli: i64,
    ) -> EngineResult<()> {
        let mut tx = self.pool.begin().await?;

        // Closed gate before any argument validation.
        let tournament = fetch_tournament(&mut *tx, tournament_id).await?;
        tournament.ensure_open()?;

        validate_round_no(round_no)?;
        validate_seat(seat)?;
        if soli < 0 {
            return Err(EngineError::InvalidArgument(
                "soli count cannot be negative".to_string(),
            ));
        }

        let seat_row = sqlx::query(
            "SELECT participant_id FROM tournament_seats
             WHERE tournament_id = $1 AND round_no = $2 AND table_no = $3 AND seat = $4",
        )
        .bind(tournament_id)
        .bind(round_no as i32)
        .bind(table_no as i32)
        .bind(seat as i32)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(EngineError::TableNotFound { round_no, table_no })?;
        let participant_id: ParticipantId = seat_row.get("participant_id");

        upsert_score(
            &mut tx,
            tournament_id,
            round_no,
            table_no,
            participant_id,
            points,
            soli,
        )
        .await?;

        tx.commit().await?;

        log::info!(
            "Recorded result for tournament {tournament_id} round {round_no} table {table_no} seat {seat}"
        );
        Ok(())
    }

    /// Submit a whole table at once, enforcing the zero-sum rule up front.
    ///
    /// The entries must cover exactly the table's seated participants. All
    /// upserts land in one transaction.
    ///
    /// # Errors
    ///
    /// * `NonZeroSum` - the points do not sum to zero
    /// * `InvalidArgument` - entries do not match the table's seats
    pub async fn submit_table(
        &self,
        tournament_id: TournamentId,
        round_no: u32,
        table_no: u32,
        entries: &[SeatEntry],
    ) -> EngineResult<()> {
        let mut tx = self.pool.begin().await?;

        // Closed gate before any argument validation.
        let tournament = fetch_tournament(&mut *tx, tournament_id).await?;
        tournament.ensure_open()?;

        validate_round_no(round_no)?;
        if entries.iter().any(|e| e.soli < 0) {
            return Err(EngineError::InvalidArgument(
                "soli count cannot be negative".to_string(),
            ));
        }

        let seat_rows = sqlx::query(
            "SELECT participant_id FROM tournament_seats
             WHERE tournament_id = $1 AND round_no = $2 AND table_no = $3
             ORDER BY seat ASC",
        )
        .bind(tournament_id)
        .bind(round_no as i32)
        .bind(table_no as i32)
        .fetch_all(&mut *tx)
        .await?;

        if seat_rows.is_empty() {
            return Err(EngineError::TableNotFound { round_no, table_no });
        }

        let mut seated: Vec<ParticipantId> = seat_rows
            .iter()
            .map(|r| r.get::<i64, _>("participant_id"))
            .collect();
        let mut entered: Vec<ParticipantId> = entries.iter().map(|e| e.participant_id).collect();
        seated.sort_unstable();
        entered.sort_unstable();
        if seated != entered {
            return Err(EngineError::InvalidArgument(format!(
                "entries must cover exactly the {} participants seated at table {table_no}",
                seated.len()
            )));
        }

        let sum: i64 = entries.iter().map(|e| e.points).sum();
        if sum != 0 {
            return Err(EngineError::NonZeroSum { table_no, sum });
        }

        for entry in entries {
            upsert_score(
                &mut tx,
                tournament_id,
                round_no,
                table_no,
                entry.participant_id,
                entry.points,
                entry.soli,
            )
            .await?;
        }

        tx.commit().await?;

        log::info!(
            "Recorded full table {table_no} of tournament {tournament_id} round {round_no} ({} seats)",
            entries.len()
        );
        Ok(())
    }

    /// Recompute a table's validation state. Advisory only, never mutates.
    pub async fn validate_table(
        &self,
        tournament_id: TournamentId,
        round_no: u32,
        table_no: u32,
    ) -> EngineResult<TableValidation> {
        validate_round_no(round_no)?;
        fetch_tournament(self.pool.as_ref(), tournament_id).await?;

        let expected: i64 = sqlx::query(
            "SELECT COUNT(*) AS c FROM tournament_seats
             WHERE tournament_id = $1 AND round_no = $2 AND table_no = $3",
        )
        .bind(tournament_id)
        .bind(round_no as i32)
        .bind(table_no as i32)
        .fetch_one(self.pool.as_ref())
        .await?
        .get("c");

        if expected == 0 {
            return Err(EngineError::TableNotFound { round_no, table_no });
        }

        let rows = sqlx::query(
            "SELECT points FROM tournament_scores
             WHERE tournament_id = $1 AND round_no = $2 AND table_no = $3",
        )
        .bind(tournament_id)
        .bind(round_no as i32)
        .bind(table_no as i32)
        .fetch_all(self.pool.as_ref())
        .await?;

        let points: Vec<i64> = rows.iter().map(|r| r.get::<i64, _>("points")).collect();
        Ok(validate_points(&points, expected as usize))
    }

    /// Entry progress for one round: done/open tables and score counts.
    pub async fn round_progress(
        &self,
        tournament_id: TournamentId,
        round_no: u32,
    ) -> EngineResult<RoundProgress> {
        validate_round_no(round_no)?;
        fetch_tournament(self.pool.as_ref(), tournament_id).await?;

        let seat_rows = sqlx::query(
            "SELECT table_no, COUNT(*) AS c FROM tournament_seats
             WHERE tournament_id = $1 AND round_no = $2
             GROUP BY table_no",
        )
        .bind(tournament_id)
        .bind(round_no as i32)
        .fetch_all(self.pool.as_ref())
        .await?;

        let score_rows = sqlx::query(
            "SELECT table_no, COUNT(*) AS c FROM tournament_scores
             WHERE tournament_id = $1 AND round_no = $2
             GROUP BY table_no",
        )
        .bind(tournament_id)
        .bind(round_no as i32)
        .fetch_all(self.pool.as_ref())
        .await?;

        let scored: std::collections::HashMap<i32, i64> = score_rows
            .iter()
            .map(|r| (r.get::<i32, _>("table_no"), r.get::<i64, _>("c")))
            .collect();

        let mut done_tables = 0;
        let mut expected_scores = 0usize;
        for row in &seat_rows {
            let table_no: i32 = row.get("table_no");
            let seats: i64 = row.get("c");
            expected_scores += seats as usize;
            if scored.get(&table_no).copied().unwrap_or(0) >= seats {
                done_tables += 1;
            }
        }

        Ok(RoundProgress {
            total_tables: seat_rows.len(),
            done_tables,
            entered_scores: scored.values().map(|&c| c as usize).sum(),
            expected_scores,
        })
    }

    /// Scores recorded for one table, in seat order.
    pub async fn table_scores(
        &self,
        tournament_id: TournamentId,
        round_no: u32,
        table_no: u32,
    ) -> EngineResult<Vec<SeatScore>> {
        validate_round_no(round_no)?;
        fetch_tournament(self.pool.as_ref(), tournament_id).await?;

        let rows = sqlx::query(
            r#"
            SELECT s.seat, s.participant_id, tp.player_no, tp.display_name,
                   sc.points, sc.soli
            FROM tournament_seats s
            JOIN tournament_participants tp ON tp.id = s.participant_id
            JOIN tournament_scores sc
              ON sc.tournament_id = s.tournament_id
             AND sc.round_no = s.round_no
             AND sc.participant_id = s.participant_id
            WHERE s.tournament_id = $1 AND s.round_no = $2 AND s.table_no = $3
            ORDER BY s.seat ASC
            "#,
        )
        .bind(tournament_id)
        .bind(round_no as i32)
        .bind(table_no as i32)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .iter()
            .map(|row| SeatScore {
                participant_id: row.get("participant_id"),
                player_no: row.get::<i32, _>("player_no") as u32,
                display_name: row.get("display_name"),
                table_no,
                seat: row.get::<i32, _>("seat") as u8,
                points: row.get("points"),
                soli: row.get("soli"),
            })
            .collect())
    }
}

async fn upsert_score(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    tournament_id: TournamentId,
    round_no: u32,
    table_no: u32,
    participant_id: ParticipantId,
    points: i64,
    soli: i64,
) -> EngineResult<()> {
    sqlx::query(
        r#"
        INSERT INTO tournament_scores
          (tournament_id, round_no, table_no, participant_id, points, soli, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
        ON CONFLICT (tournament_id, round_no, participant_id) DO UPDATE SET
            table_no = EXCLUDED.table_no,
            points = EXCLUDED.points,
            soli = EXCLUDED.soli,
            updated_at = NOW()
        "#,
    )
    .bind(tournament_id)
    .bind(round_no as i32)
    .bind(table_no as i32)
    .bind(participant_id)
    .bind(points)
    .bind(soli)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
