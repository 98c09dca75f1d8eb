//! Draw manager: computes and persists the table/seat layout per round.

use super::models::{Round, RoundDraw, SeatAssignment, TableDraw, validate_round_no};
use super::plan::{self, DrawEntrant};
use crate::errors::{EngineError, EngineResult};
use crate::tournament::manager::fetch_tournament;
use crate::tournament::models::TournamentId;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;

/// Minimum participants before a round can be drawn (one full table)
const MIN_ENTRANTS: usize = 4;

/// Draw manager
#[derive(Clone)]
pub struct DrawManager {
    pool: Arc<PgPool>,
}

impl DrawManager {
    /// Create a new draw manager
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Draw (or redraw) a round.
    ///
    /// Rounds must be drawn in order: round 1 first, then each next round
    /// exactly once the previous one exists. Drawing round R+1 does not
    /// require R's results to be complete, only its draw.
    ///
    /// A redraw discards the round's previous layout and all of its results
    /// unconditionally; the caller owns any confirmation step. Everything is
    /// written in one transaction: either the full new layout lands or the
    /// old state stays.
    pub async fn draw_round(
        &self,
        tournament_id: TournamentId,
        round_no: u32,
    ) -> EngineResult<RoundDraw> {
        let mut tx = self.pool.begin().await?;

        // Closed gate before any argument validation.
        let tournament = fetch_tournament(&mut *tx, tournament_id).await?;
        tournament.ensure_open()?;

        validate_round_no(round_no)?;

        let round_rows = sqlx::query(
            "SELECT round_no, draw_attempt FROM tournament_rounds
             WHERE tournament_id = $1 ORDER BY round_no ASC",
        )
        .bind(tournament_id)
        .fetch_all(&mut *tx)
        .await?;

        let drawn: Vec<u32> = round_rows
            .iter()
            .map(|r| r.get::<i32, _>("round_no") as u32)
            .collect();
        let last_round = drawn.last().copied().unwrap_or(0);
        let prev_attempt = round_rows
            .iter()
            .find(|r| r.get::<i32, _>("round_no") as u32 == round_no)
            .map(|r| r.get::<i32, _>("draw_attempt") as u32)
            .unwrap_or(0);

        if !drawn.contains(&round_no) {
            if round_no > 1 && !drawn.contains(&(round_no - 1)) {
                return Err(EngineError::RoundOutOfSequence {
                    round_no,
                    missing: round_no - 1,
                });
            }
            if last_round > 0 && round_no != last_round + 1 {
                return Err(EngineError::RoundOutOfSequence {
                    round_no,
                    missing: last_round + 1,
                });
            }
        }

        let participant_rows = sqlx::query(
            "SELECT id, player_no, display_name FROM tournament_participants
             WHERE tournament_id = $1 ORDER BY player_no ASC",
        )
        .bind(tournament_id)
        .fetch_all(&mut *tx)
        .await?;

        if participant_rows.len() < MIN_ENTRANTS {
            return Err(EngineError::InvalidArgument(format!(
                "at least {MIN_ENTRANTS} participants are required to draw, got {}",
                participant_rows.len()
            )));
        }

        let entrants: Vec<DrawEntrant> = participant_rows
            .iter()
            .map(|r| DrawEntrant {
                id: r.get("id"),
                player_no: r.get::<i32, _>("player_no") as u32,
            })
            .collect();
        let labels: HashMap<i64, (u32, String)> = participant_rows
            .iter()
            .map(|r| {
                (
                    r.get::<i64, _>("id"),
                    (
                        r.get::<i32, _>("player_no") as u32,
                        r.get::<String, _>("display_name"),
                    ),
                )
            })
            .collect();

        let prior_seats = sqlx::query(
            "SELECT round_no, table_no, participant_id FROM tournament_seats
             WHERE tournament_id = $1 AND round_no < $2",
        )
        .bind(tournament_id)
        .bind(round_no as i32)
        .fetch_all(&mut *tx)
        .await?;
        let history = plan::history_pairs(
            &prior_seats
                .iter()
                .map(|r| {
                    (
                        r.get::<i32, _>("round_no") as u32,
                        r.get::<i32, _>("table_no") as u32,
                        r.get::<i64, _>("participant_id"),
                    )
                })
                .collect::<Vec<_>>(),
        );

        let attempt = prev_attempt + 1;
        let seed = plan::draw_seed(tournament_id, round_no, attempt);
        let layout = plan::plan_round(tournament_id, round_no, attempt, &entrants, &history);

        // Redraw semantics: the previous layout and every result attached to
        // it go away together with the new layout landing, all in this one
        // transaction.
        sqlx::query("DELETE FROM tournament_scores WHERE tournament_id = $1 AND round_no = $2")
            .bind(tournament_id)
            .bind(round_no as i32)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM tournament_seats WHERE tournament_id = $1 AND round_no = $2")
            .bind(tournament_id)
            .bind(round_no as i32)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM tournament_rounds WHERE tournament_id = $1 AND round_no = $2")
            .bind(tournament_id)
            .bind(round_no as i32)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO tournament_rounds (tournament_id, round_no, draw_seed, draw_attempt, drawn_at)
             VALUES ($1, $2, $3, $4, NOW())",
        )
        .bind(tournament_id)
        .bind(round_no as i32)
        .bind(seed)
        .bind(attempt as i32)
        .execute(&mut *tx)
        .await?;

        let mut tables = Vec::with_capacity(layout.tables.len());
        for (table_idx, members) in layout.tables.iter().enumerate() {
            let table_no = table_idx as u32 + 1;
            let mut seats = Vec::with_capacity(members.len());
            for (seat_idx, &participant_id) in members.iter().enumerate() {
                let seat = seat_idx as u8 + 1;
                sqlx::query(
                    "INSERT INTO tournament_seats
                       (tournament_id, round_no, table_no, seat, participant_id)
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(tournament_id)
                .bind(round_no as i32)
                .bind(table_no as i32)
                .bind(seat as i32)
                .bind(participant_id)
                .execute(&mut *tx)
                .await?;

                let (player_no, display_name) = labels
                    .get(&participant_id)
                    .cloned()
                    .ok_or(EngineError::ParticipantNotFound(participant_id))?;
                seats.push(SeatAssignment {
                    table_no,
                    seat,
                    participant_id,
                    player_no,
                    display_name,
                });
            }
            tables.push(TableDraw { table_no, seats });
        }

        tx.commit().await?;

        log::info!(
            "Drew round {round_no} of tournament {tournament_id}: {} tables, attempt {attempt}",
            tables.len()
        );
        Ok(RoundDraw {
            round_no,
            draw_attempt: attempt,
            tables,
        })
    }

    /// Get the persisted draw of a round.
    pub async fn get_draw(
        &self,
        tournament_id: TournamentId,
        round_no: u32,
    ) -> EngineResult<RoundDraw> {
        validate_round_no(round_no)?;
        fetch_tournament(self.pool.as_ref(), tournament_id).await?;

        let round = sqlx::query(
            "SELECT draw_attempt FROM tournament_rounds
             WHERE tournament_id = $1 AND round_no = $2",
        )
        .bind(tournament_id)
        .bind(round_no as i32)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(EngineError::RoundNotDrawn { round_no })?;
        let draw_attempt = round.get::<i32, _>("draw_attempt") as u32;

        let rows = sqlx::query(
            r#"
            SELECT s.table_no, s.seat, s.participant_id, tp.player_no, tp.display_name
            FROM tournament_seats s
            JOIN tournament_participants tp ON tp.id = s.participant_id
            WHERE s.tournament_id = $1 AND s.round_no = $2
            ORDER BY s.table_no ASC, s.seat ASC
            "#,
        )
        .bind(tournament_id)
        .bind(round_no as i32)
        .fetch_all(self.pool.as_ref())
        .await?;

        let mut tables: Vec<TableDraw> = Vec::new();
        for row in rows {
            let assignment = SeatAssignment {
                table_no: row.get::<i32, _>("table_no") as u32,
                seat: row.get::<i32, _>("seat") as u8,
                participant_id: row.get("participant_id"),
                player_no: row.get::<i32, _>("player_no") as u32,
                display_name: row.get("display_name"),
            };
            match tables.last_mut() {
                Some(table) if table.table_no == assignment.table_no => {
                    table.seats.push(assignment);
                }
                _ => tables.push(TableDraw {
                    table_no: assignment.table_no,
                    seats: vec![assignment],
                }),
            }
        }

        Ok(RoundDraw {
            round_no,
            draw_attempt,
            tables,
        })
    }

    /// List drawn rounds in round order.
    pub async fn list_rounds(&self, tournament_id: TournamentId) -> EngineResult<Vec<Round>> {
        fetch_tournament(self.pool.as_ref(), tournament_id).await?;

        let rows = sqlx::query(
            "SELECT tournament_id, round_no, draw_seed, draw_attempt, drawn_at
             FROM tournament_rounds
             WHERE tournament_id = $1
             ORDER BY round_no ASC",
        )
        .bind(tournament_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .iter()
            .map(|row| Round {
                tournament_id: row.get("tournament_id"),
                round_no: row.get::<i32, _>("round_no") as u32,
                draw_seed: row.get("draw_seed"),
                draw_attempt: row.get::<i32, _>("draw_attempt") as u32,
                drawn_at: row.get::<chrono::NaiveDateTime, _>("drawn_at").and_utc(),
            })
            .collect())
    }
}
