//! Draw engine module.
//!
//! Deterministically assigns every participant to one (table, seat) pair per
//! round:
//! - Round 1 seats in `player_no` order, four per table
//! - Later rounds run a seeded anti-repeat local search (best-effort
//!   heuristic, reproducible per seed)
//! - `N mod 4` leftover participants form a single undersized remainder
//!   table
//! - A redraw atomically replaces the layout and discards the round's
//!   results
//!
//! ## Example
//!
//! ```no_run
//! use skat_tourney::draw::DrawManager;
//! use skat_tourney::db::Database;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let draws = DrawManager::new(Arc::new(db.pool().clone()));
//!
//!     let draw = draws.draw_round(1, 1).await?;
//!     println!("{} tables drawn", draw.tables.len());
//!     Ok(())
//! }
//! ```

pub mod manager;
pub mod models;
pub mod plan;

pub use manager::DrawManager;
pub use models::{Round, RoundDraw, SeatAssignment, TableDraw, validate_round_no, validate_seat};
pub use plan::{
    DrawEntrant, DrawPlan, PairKey, draw_seed, history_pairs, pair_key, plan_round, table_sizes,
};
