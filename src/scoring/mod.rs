//! Scoring and ranking module.
//!
//! Turns committed scores into round and overall standings. Ordering is a
//! fully specified total order: points descending, soli descending, display
//! name ascending (case-insensitive), participant number ascending. Equal
//! (points, soli) share a competition place and the following place skips.
//! Only complete, zero-sum tables count; everything else contributes
//! nothing, so standings can always be computed mid-entry.
//!
//! ## Example
//!
//! ```no_run
//! use skat_tourney::scoring::ScoringManager;
//! use skat_tourney::db::Database;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let scoring = ScoringManager::new(Arc::new(db.pool().clone()));
//!
//!     for row in scoring.overall_standings(1).await? {
//!         println!("{:>3}. {} ({})", row.place, row.display_name, row.total_points);
//!     }
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod manager;
pub mod models;

pub use engine::{overall_standings, round_standings, valid_tables};
pub use manager::ScoringManager;
pub use models::{OverallStanding, RosterEntry, RoundStanding, ScoreRow, TableShape};
