//! Tournament lifecycle module.
//!
//! This module owns the tournament record and its one-way `closed` flag:
//! - Tournament creation with marker/date validation
//! - The close gate (marker format + complete results required)
//! - Cascade deletion of everything a tournament owns
//!
//! Every other module loads the tournament at the start of its mutating
//! operations so a closed tournament rejects all structural change before
//! any other check.
//!
//! ## Example
//!
//! ```no_run
//! use skat_tourney::tournament::{NewTournament, TournamentManager};
//! use skat_tourney::db::Database;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let tournaments = TournamentManager::new(Arc::new(db.pool().clone()));
//!
//!     let id = tournaments
//!         .create(NewTournament {
//!             title: "Stadtmeisterschaft".to_string(),
//!             event_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
//!             start_time: "14:00".to_string(),
//!             marker: Some("260314ABCD".to_string()),
//!             location: None,
//!             organizer: None,
//!             description: None,
//!             min_participants: 0,
//!             max_participants: 40,
//!         })
//!         .await?;
//!     println!("Created tournament: {id}");
//!     Ok(())
//! }
//! ```

pub mod manager;
pub mod marker;
pub mod models;

pub use manager::TournamentManager;
pub use marker::{event_date_to_marker_prefix, normalize_marker, validate_marker_for_event_date};
pub use models::{NewTournament, TABLE_SIZE, Tournament, TournamentCounts, TournamentId};
