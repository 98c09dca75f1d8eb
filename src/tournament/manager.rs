//! Tournament manager for creating, closing, and deleting tournaments.

use super::models::{NewTournament, Tournament, TournamentCounts, TournamentId};
use crate::errors::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::sync::Arc;

/// Map a `tournaments` row to the model type.
pub(crate) fn tournament_from_row(row: &PgRow) -> Tournament {
    Tournament {
        id: row.get("id"),
        title: row.get("title"),
        event_date: row.get("event_date"),
        start_time: row.get("start_time"),
        marker: row.get("marker"),
        location: row.get("location"),
        organizer: row.get("organizer"),
        description: row.get("description"),
        min_participants: row.get::<i32, _>("min_participants") as u32,
        max_participants: row.get::<i32, _>("max_participants") as u32,
        closed_at: row
            .get::<Option<chrono::NaiveDateTime>, _>("closed_at")
            .map(|dt| dt.and_utc()),
        created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        updated_at: row.get::<chrono::NaiveDateTime, _>("updated_at").and_utc(),
    }
}

/// Fetch a tournament by id, on the pool or inside a transaction.
///
/// Shared across all managers: every mutating operation loads the tournament
/// first so the closed gate can short-circuit before any other validation.
pub(crate) async fn fetch_tournament<'e, E>(
    executor: E,
    tournament_id: TournamentId,
) -> EngineResult<Tournament>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query(
        r#"
        SELECT id, title, event_date, start_time, marker, location, organizer,
               description, min_participants, max_participants, closed_at,
               created_at, updated_at
        FROM tournaments
        WHERE id = $1
        "#,
    )
    .bind(tournament_id)
    .fetch_optional(executor)
    .await?
    .ok_or(EngineError::TournamentNotFound(tournament_id))?;

    Ok(tournament_from_row(&row))
}

/// Tournament manager
#[derive(Clone)]
pub struct TournamentManager {
    pool: Arc<PgPool>,
}

impl TournamentManager {
    /// Create a new tournament manager
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new tournament
    pub async fn create(&self, new: NewTournament) -> EngineResult<TournamentId> {
        new.validate()?;

        let marker = match &new.marker {
            Some(m) => Some(super::marker::validate_marker_for_event_date(
                m,
                new.event_date,
            )?),
            None => None,
        };

        let row = sqlx::query(
            r#"
            INSERT INTO tournaments
              (title, event_date, start_time, marker, location, organizer,
               description, min_participants, max_participants, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(new.title.trim())
        .bind(new.event_date)
        .bind(new.start_time.trim())
        .bind(marker)
        .bind(&new.location)
        .bind(&new.organizer)
        .bind(&new.description)
        .bind(new.min_participants as i32)
        .bind(new.max_participants as i32)
        .fetch_one(self.pool.as_ref())
        .await?;

        let id: TournamentId = row.get("id");
        log::info!("Created tournament {id}");
        Ok(id)
    }

    /// Get a tournament by id
    pub async fn get(&self, tournament_id: TournamentId) -> EngineResult<Tournament> {
        fetch_tournament(self.pool.as_ref(), tournament_id).await
    }

    /// Participant and table counts for a tournament
    pub async fn counts(&self, tournament_id: TournamentId) -> EngineResult<TournamentCounts> {
        fetch_tournament(self.pool.as_ref(), tournament_id).await?;

        let row = sqlx::query(
            "SELECT COUNT(*) AS c FROM tournament_participants WHERE tournament_id = $1",
        )
        .bind(tournament_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        let participants: i64 = row.get("c");
        Ok(TournamentCounts::from_participants(participants as usize))
    }

    /// Close the tournament. One-way: there is no reopen.
    ///
    /// Preconditions: a valid 10-character marker matching the event date,
    /// at least one drawn round, and a recorded score for every drawn seat.
    ///
    /// # Errors
    ///
    /// * `TournamentClosed` - already closed
    /// * `InvalidArgument` - marker missing or malformed
    /// * `NoRoundsDrawn` / `ScoresIncomplete` - result capture not finished
    pub async fn close(&self, tournament_id: TournamentId) -> EngineResult<DateTime<Utc>> {
        let mut tx = self.pool.begin().await?;

        let tournament = fetch_tournament(&mut *tx, tournament_id).await?;
        tournament.ensure_open()?;

        let marker = tournament.marker.as_deref().ok_or_else(|| {
            EngineError::InvalidArgument(
                "marker is missing; set the 10-character marker before closing".to_string(),
            )
        })?;
        super::marker::validate_marker_for_event_date(marker, tournament.event_date)?;

        let expected: i64 = sqlx::query(
            "SELECT COUNT(*) AS c FROM tournament_seats WHERE tournament_id = $1",
        )
        .bind(tournament_id)
        .fetch_one(&mut *tx)
        .await?
        .get("c");

        if expected == 0 {
            return Err(EngineError::NoRoundsDrawn);
        }

        let entered: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) AS c
            FROM tournament_seats ts
            JOIN tournament_scores sc
              ON sc.tournament_id = ts.tournament_id
             AND sc.round_no = ts.round_no
             AND sc.participant_id = ts.participant_id
            WHERE ts.tournament_id = $1
            "#,
        )
        .bind(tournament_id)
        .fetch_one(&mut *tx)
        .await?
        .get("c");

        if entered < expected {
            return Err(EngineError::ScoresIncomplete {
                entered: entered as u64,
                expected: expected as u64,
            });
        }

        let row = sqlx::query(
            r#"
            UPDATE tournaments
            SET closed_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND closed_at IS NULL
            RETURNING closed_at
            "#,
        )
        .bind(tournament_id)
        .fetch_one(&mut *tx)
        .await?;

        let closed_at = row
            .get::<Option<chrono::NaiveDateTime>, _>("closed_at")
            .map(|dt| dt.and_utc())
            .ok_or_else(|| {
                EngineError::PartialWriteAborted("close did not record a timestamp".to_string())
            })?;

        tx.commit().await?;

        log::info!("Closed tournament {tournament_id} at {closed_at}");
        Ok(closed_at)
    }

    /// Delete a tournament and everything it owns.
    ///
    /// Scores, seats, rounds, and participants are removed with the
    /// tournament in a single transaction.
    pub async fn delete(&self, tournament_id: TournamentId) -> EngineResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tournament_scores WHERE tournament_id = $1")
            .bind(tournament_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM tournament_seats WHERE tournament_id = $1")
            .bind(tournament_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM tournament_rounds WHERE tournament_id = $1")
            .bind(tournament_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM tournament_participants WHERE tournament_id = $1")
            .bind(tournament_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM tournaments WHERE id = $1")
            .bind(tournament_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EngineError::TournamentNotFound(tournament_id));
        }

        tx.commit().await?;

        log::info!("Deleted tournament {tournament_id}");
        Ok(())
    }
}
