//! Participant registry manager.
//!
//! Owns participant identity and the numbering invariants: numbers are
//! handed out as the lowest free integer, removals leave gaps, and the
//! explicit renumber operations rewrite numbers as one atomic batch.

use super::models::{
    AddressId, NewAddress, Participant, ParticipantId, SwapOutcome, display_label,
    is_blocked_status,
};
use super::numbering::{self, Renumbering};
use crate::errors::{EngineError, EngineResult};
use crate::tournament::manager::fetch_tournament;
use crate::tournament::models::TournamentId;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use std::sync::Arc;

fn participant_from_row(row: &PgRow) -> Participant {
    Participant {
        id: row.get("id"),
        tournament_id: row.get("tournament_id"),
        player_no: row.get::<i32, _>("player_no") as u32,
        address_id: row.get("address_id"),
        display_name: row.get("display_name"),
        created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        updated_at: row.get::<chrono::NaiveDateTime, _>("updated_at").and_utc(),
    }
}

const PARTICIPANT_COLUMNS: &str =
    "id, tournament_id, player_no, address_id, display_name, created_at, updated_at";

/// Participant registry manager
#[derive(Clone)]
pub struct RegistryManager {
    pool: Arc<PgPool>,
}

impl RegistryManager {
    /// Create a new registry manager
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// List participants ordered by `player_no`.
    pub async fn list(&self, tournament_id: TournamentId) -> EngineResult<Vec<Participant>> {
        fetch_tournament(self.pool.as_ref(), tournament_id).await?;

        let rows = sqlx::query(&format!(
            "SELECT {PARTICIPANT_COLUMNS}
             FROM tournament_participants
             WHERE tournament_id = $1
             ORDER BY player_no ASC"
        ))
        .bind(tournament_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.iter().map(participant_from_row).collect())
    }

    /// Lowest unused participant number.
    pub async fn next_free_number(&self, tournament_id: TournamentId) -> EngineResult<u32> {
        fetch_tournament(self.pool.as_ref(), tournament_id).await?;
        let used = self.used_numbers(self.pool.as_ref(), tournament_id).await?;
        Ok(numbering::next_free_number(&used))
    }

    /// All missing numbers in `[1, max(player_no)]`. Pure read, no mutation.
    pub async fn check_gaps(&self, tournament_id: TournamentId) -> EngineResult<Vec<u32>> {
        fetch_tournament(self.pool.as_ref(), tournament_id).await?;
        let used = self.used_numbers(self.pool.as_ref(), tournament_id).await?;
        Ok(numbering::find_gaps(&used))
    }

    /// Add an existing address as a participant, assigning the lowest free number.
    ///
    /// # Errors
    ///
    /// * `TournamentClosed` - tournament is closed
    /// * `CapacityExceeded` - configured participant cap reached
    /// * `Duplicate` - address is already a participant
    /// * `AddressNotFound` - address does not exist
    pub async fn add(
        &self,
        tournament_id: TournamentId,
        address_id: AddressId,
    ) -> EngineResult<Participant> {
        let mut tx = self.pool.begin().await?;

        let tournament = fetch_tournament(&mut *tx, tournament_id).await?;
        tournament.ensure_open()?;

        let used = self.used_numbers(&mut *tx, tournament_id).await?;
        if !tournament.has_capacity_for_another(used.len()) {
            return Err(EngineError::CapacityExceeded {
                max: tournament.max_participants,
            });
        }

        let dup = sqlx::query(
            "SELECT 1 AS x FROM tournament_participants
             WHERE tournament_id = $1 AND address_id = $2",
        )
        .bind(tournament_id)
        .bind(address_id)
        .fetch_optional(&mut *tx)
        .await?;
        if dup.is_some() {
            return Err(EngineError::Duplicate { address_id });
        }

        let address = sqlx::query("SELECT last_name, first_name, town FROM addresses WHERE id = $1")
            .bind(address_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(EngineError::AddressNotFound(address_id))?;

        let label = display_label(
            address.get::<String, _>("last_name").as_str(),
            address.get::<String, _>("first_name").as_str(),
            address.get::<String, _>("town").as_str(),
        );
        let player_no = numbering::next_free_number(&used);

        let participant =
            insert_participant(&mut tx, tournament_id, player_no, address_id, &label).await?;

        tx.commit().await?;

        log::info!(
            "Added participant {} (no {player_no}) to tournament {tournament_id}",
            participant.id
        );
        Ok(participant)
    }

    /// Create a new address and add it as a participant in one step.
    pub async fn quick_add(
        &self,
        tournament_id: TournamentId,
        address: NewAddress,
    ) -> EngineResult<Participant> {
        let mut tx = self.pool.begin().await?;

        // Closed gate before any argument validation.
        let tournament = fetch_tournament(&mut *tx, tournament_id).await?;
        tournament.ensure_open()?;

        address.validate()?;

        let used = self.used_numbers(&mut *tx, tournament_id).await?;
        if !tournament.has_capacity_for_another(used.len()) {
            return Err(EngineError::CapacityExceeded {
                max: tournament.max_participants,
            });
        }

        let row = sqlx::query(
            r#"
            INSERT INTO addresses (last_name, first_name, town, status, created_at, updated_at)
            VALUES ($1, $2, $3, 'active', NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(address.last_name.trim())
        .bind(address.first_name.trim())
        .bind(address.town.trim())
        .fetch_one(&mut *tx)
        .await?;
        let address_id: AddressId = row.get("id");

        let label = display_label(&address.last_name, &address.first_name, &address.town);
        let player_no = numbering::next_free_number(&used);

        let participant =
            insert_participant(&mut tx, tournament_id, player_no, address_id, &label).await?;

        tx.commit().await?;

        log::info!(
            "Quick-added participant {} (no {player_no}) to tournament {tournament_id}",
            participant.id
        );
        Ok(participant)
    }

    /// Remove a participant.
    ///
    /// The participant's seats and scores in any drawn round are removed
    /// with it; the affected tables then report as incomplete. The freed
    /// number becomes a gap unless `renumber` is set, which immediately
    /// compacts numbers from the removed one upward.
    pub async fn remove(
        &self,
        tournament_id: TournamentId,
        participant_id: ParticipantId,
        renumber: bool,
    ) -> EngineResult<()> {
        let mut tx = self.pool.begin().await?;

        let tournament = fetch_tournament(&mut *tx, tournament_id).await?;
        tournament.ensure_open()?;

        let row = sqlx::query(
            "SELECT player_no FROM tournament_participants
             WHERE id = $1 AND tournament_id = $2",
        )
        .bind(participant_id)
        .bind(tournament_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(EngineError::ParticipantNotFound(participant_id))?;
        let removed_no = row.get::<i32, _>("player_no") as u32;

        sqlx::query(
            "DELETE FROM tournament_scores WHERE tournament_id = $1 AND participant_id = $2",
        )
        .bind(tournament_id)
        .bind(participant_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "DELETE FROM tournament_seats WHERE tournament_id = $1 AND participant_id = $2",
        )
        .bind(tournament_id)
        .bind(participant_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM tournament_participants WHERE id = $1 AND tournament_id = $2")
            .bind(participant_id)
            .bind(tournament_id)
            .execute(&mut *tx)
            .await?;

        if renumber {
            let roster = self.roster(&mut *tx, tournament_id).await?;
            let plan = numbering::renumber_from_plan(&roster, removed_no);
            apply_renumber_plan(&mut tx, tournament_id, &plan).await?;
        }

        tx.commit().await?;

        log::info!(
            "Removed participant {participant_id} (no {removed_no}) from tournament {tournament_id}, renumber={renumber}"
        );
        Ok(())
    }

    /// Reassign `1..=N` to all participants, preserving relative order.
    ///
    /// Idempotent: an already-dense roster produces no writes. Returns the
    /// number of participants whose number changed.
    pub async fn renumber_all(&self, tournament_id: TournamentId) -> EngineResult<usize> {
        let mut tx = self.pool.begin().await?;

        let tournament = fetch_tournament(&mut *tx, tournament_id).await?;
        tournament.ensure_open()?;

        let roster = self.roster(&mut *tx, tournament_id).await?;
        let plan = numbering::renumber_all_plan(&roster);
        apply_renumber_plan(&mut tx, tournament_id, &plan).await?;

        tx.commit().await?;

        log::info!(
            "Renumbered tournament {tournament_id}: {} participants changed",
            plan.len()
        );
        Ok(plan.len())
    }

    /// Compact numbers `>= start_no`, leaving lower numbers untouched.
    pub async fn renumber_from(
        &self,
        tournament_id: TournamentId,
        start_no: u32,
    ) -> EngineResult<usize> {
        let mut tx = self.pool.begin().await?;

        // Closed gate before any argument validation.
        let tournament = fetch_tournament(&mut *tx, tournament_id).await?;
        tournament.ensure_open()?;

        if start_no == 0 {
            return Err(EngineError::InvalidArgument(
                "renumber start number must be positive".to_string(),
            ));
        }

        let roster = self.roster(&mut *tx, tournament_id).await?;
        let plan = numbering::renumber_from_plan(&roster, start_no);
        apply_renumber_plan(&mut tx, tournament_id, &plan).await?;

        tx.commit().await?;

        log::info!(
            "Renumbered tournament {tournament_id} from {start_no}: {} participants changed",
            plan.len()
        );
        Ok(plan.len())
    }

    /// Swap a participant's address.
    ///
    /// If the target address already belongs to another participant of the
    /// tournament, the two trade addresses and display labels; otherwise the
    /// address is replaced in place. Player numbers are unchanged either way.
    /// The trade is written as one multi-row statement describing both new
    /// states, never as two sequential updates.
    ///
    /// # Errors
    ///
    /// * `BlockedAddress` - target address is blocked
    /// * `SameAddress` - target equals the current address (informational)
    pub async fn swap(
        &self,
        tournament_id: TournamentId,
        participant_id: ParticipantId,
        new_address_id: AddressId,
    ) -> EngineResult<SwapOutcome> {
        let mut tx = self.pool.begin().await?;

        let tournament = fetch_tournament(&mut *tx, tournament_id).await?;
        tournament.ensure_open()?;

        let tp = sqlx::query(
            "SELECT id, address_id, player_no FROM tournament_participants
             WHERE id = $1 AND tournament_id = $2",
        )
        .bind(participant_id)
        .bind(tournament_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(EngineError::ParticipantNotFound(participant_id))?;
        let old_address_id: AddressId = tp.get("address_id");

        let new_address = sqlx::query(
            "SELECT last_name, first_name, town, status FROM addresses WHERE id = $1",
        )
        .bind(new_address_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(EngineError::AddressNotFound(new_address_id))?;

        if is_blocked_status(new_address.get::<Option<String>, _>("status").as_deref()) {
            return Err(EngineError::BlockedAddress {
                address_id: new_address_id,
            });
        }

        if new_address_id == old_address_id {
            return Err(EngineError::SameAddress);
        }

        let new_label = display_label(
            new_address.get::<String, _>("last_name").as_str(),
            new_address.get::<String, _>("first_name").as_str(),
            new_address.get::<String, _>("town").as_str(),
        );

        let other = sqlx::query(
            "SELECT id FROM tournament_participants
             WHERE tournament_id = $1 AND address_id = $2",
        )
        .bind(tournament_id)
        .bind(new_address_id)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match other {
            Some(other_row) => {
                let other_participant_id: ParticipantId = other_row.get("id");

                let old_address = sqlx::query(
                    "SELECT last_name, first_name, town FROM addresses WHERE id = $1",
                )
                .bind(old_address_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(EngineError::AddressNotFound(old_address_id))?;
                let old_label = display_label(
                    old_address.get::<String, _>("last_name").as_str(),
                    old_address.get::<String, _>("first_name").as_str(),
                    old_address.get::<String, _>("town").as_str(),
                );

                // Two-way exchange as a single statement: both new states are
                // described at once, so no intermediate row ever holds a
                // duplicate address within the tournament.
                let result = sqlx::query(
                    r#"
                    UPDATE tournament_participants AS tp
                    SET address_id = v.address_id,
                        display_name = v.display_name,
                        updated_at = NOW()
                    FROM (VALUES ($1::bigint, $2::bigint, $3::text),
                                 ($4::bigint, $5::bigint, $6::text))
                         AS v(id, address_id, display_name)
                    WHERE tp.id = v.id AND tp.tournament_id = $7
                    "#,
                )
                .bind(participant_id)
                .bind(new_address_id)
                .bind(&new_label)
                .bind(other_participant_id)
                .bind(old_address_id)
                .bind(&old_label)
                .bind(tournament_id)
                .execute(&mut *tx)
                .await?;

                if result.rows_affected() != 2 {
                    return Err(EngineError::PartialWriteAborted(format!(
                        "address trade touched {} rows instead of 2",
                        result.rows_affected()
                    )));
                }

                SwapOutcome::Traded {
                    participant_id,
                    other_participant_id,
                }
            }
            None => {
                sqlx::query(
                    r#"
                    UPDATE tournament_participants
                    SET address_id = $1, display_name = $2, updated_at = NOW()
                    WHERE id = $3 AND tournament_id = $4
                    "#,
                )
                .bind(new_address_id)
                .bind(&new_label)
                .bind(participant_id)
                .bind(tournament_id)
                .execute(&mut *tx)
                .await?;

                SwapOutcome::Replaced {
                    participant_id,
                    old_address_id,
                    new_address_id,
                }
            }
        };

        tx.commit().await?;

        log::info!("Swap in tournament {tournament_id}: {outcome:?}");
        Ok(outcome)
    }

    async fn used_numbers<'e, E>(
        &self,
        executor: E,
        tournament_id: TournamentId,
    ) -> EngineResult<Vec<u32>>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let rows =
            sqlx::query("SELECT player_no FROM tournament_participants WHERE tournament_id = $1")
                .bind(tournament_id)
                .fetch_all(executor)
                .await?;
        Ok(rows
            .iter()
            .map(|r| r.get::<i32, _>("player_no") as u32)
            .collect())
    }

    async fn roster<'e, E>(
        &self,
        executor: E,
        tournament_id: TournamentId,
    ) -> EngineResult<Vec<(ParticipantId, u32)>>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let rows = sqlx::query(
            "SELECT id, player_no FROM tournament_participants WHERE tournament_id = $1",
        )
        .bind(tournament_id)
        .fetch_all(executor)
        .await?;
        Ok(rows
            .iter()
            .map(|r| (r.get::<i64, _>("id"), r.get::<i32, _>("player_no") as u32))
            .collect())
    }
}

async fn insert_participant(
    tx: &mut Transaction<'_, Postgres>,
    tournament_id: TournamentId,
    player_no: u32,
    address_id: AddressId,
    display_name: &str,
) -> EngineResult<Participant> {
    let row = sqlx::query(&format!(
        "INSERT INTO tournament_participants
           (tournament_id, player_no, address_id, display_name, created_at, updated_at)
         VALUES ($1, $2, $3, $4, NOW(), NOW())
         RETURNING {PARTICIPANT_COLUMNS}"
    ))
    .bind(tournament_id)
    .bind(player_no as i32)
    .bind(address_id)
    .bind(display_name)
    .fetch_one(&mut **tx)
    .await?;

    Ok(participant_from_row(&row))
}

/// Apply a renumbering plan as one multi-row statement.
///
/// The whole rewrite is a single `UPDATE ... FROM (VALUES ...)`, so a
/// concurrent reader never observes a half-renumbered roster and the unique
/// number constraint sees only final states.
async fn apply_renumber_plan(
    tx: &mut Transaction<'_, Postgres>,
    tournament_id: TournamentId,
    plan: &[Renumbering],
) -> EngineResult<()> {
    if plan.is_empty() {
        return Ok(());
    }

    let mut sql = String::from(
        "UPDATE tournament_participants AS tp
         SET player_no = v.player_no, updated_at = NOW()
         FROM (VALUES ",
    );
    let mut bind_no = 1;
    for i in 0..plan.len() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&format!("(${}::bigint, ${}::int)", bind_no, bind_no + 1));
        bind_no += 2;
    }
    sql.push_str(&format!(
        ") AS v(id, player_no)
         WHERE tp.id = v.id AND tp.tournament_id = ${bind_no}"
    ));

    let mut query = sqlx::query(&sql);
    for row in plan {
        query = query.bind(row.participant_id).bind(row.new_player_no as i32);
    }
    query = query.bind(tournament_id);

    let result = query.execute(&mut **tx).await?;
    if result.rows_affected() != plan.len() as u64 {
        return Err(EngineError::PartialWriteAborted(format!(
            "renumber touched {} rows, expected {}",
            result.rows_affected(),
            plan.len()
        )));
    }

    Ok(())
}
