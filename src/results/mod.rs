//! Result capture module.
//!
//! Records per-seat outcomes (signed points and soli count) against a drawn
//! round and checks the zero-sum closure rule per table. Entry order is
//! unconstrained: any seat of any drawn round may be entered or corrected at
//! any time until the tournament is closed. Table validation is advisory, so
//! an unbalanced table never blocks further entry; it only keeps the table
//! out of the standings.
//!
//! ## Example
//!
//! ```no_run
//! use skat_tourney::results::ResultsManager;
//! use skat_tourney::db::Database;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let results = ResultsManager::new(Arc::new(db.pool().clone()));
//!
//!     results.submit_seat_result(1, 1, 2, 3, 21, 0).await?;
//!     let state = results.validate_table(1, 1, 2).await?;
//!     println!("table 2: {state:?}");
//!     Ok(())
//! }
//! ```

pub mod manager;
pub mod models;

pub use manager::ResultsManager;
pub use models::{RoundProgress, SeatEntry, SeatScore, TableValidation, validate_points};
