//! # Skat Tourney
//!
//! A draw, numbering, and scoring engine for Skat club tournaments.
//!
//! This library manages the full lifecycle of a tournament series day:
//! registering participants under stable, gap-tolerant numbers, drawing
//! four-seat tables per round, capturing zero-sum table results, and
//! ranking participants per round and overall.
//!
//! ## Architecture
//!
//! Each domain lives in its own module with a manager over a shared
//! `PgPool`. Every mutating operation runs in one transaction and checks
//! the tournament's closed flag first, so callers never observe a
//! partially-applied write. The algorithmic cores (numbering plans, draw
//! layouts, table validation, rankings) are pure functions next to the
//! managers and carry the tests.
//!
//! ## Core Modules
//!
//! - [`tournament`]: Tournament lifecycle, marker validation, the close gate
//! - [`registry`]: Participant roster, sparse numbering, renumbering, swaps
//! - [`draw`]: Seed-reproducible table/seat draws with anti-repeat seating
//! - [`results`]: Per-seat result capture and advisory table validation
//! - [`scoring`]: Round and overall standings with competition placement
//! - [`db`]: Connection pool setup and configuration
//!
//! ## Example
//!
//! ```no_run
//! use skat_tourney::db::{Database, DatabaseConfig};
//! use skat_tourney::registry::RegistryManager;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::from_env()).await?;
//!     let registry = RegistryManager::new(Arc::new(db.pool().clone()));
//!
//!     for participant in registry.list(1).await? {
//!         println!("{:>3}  {}", participant.player_no, participant.display_name);
//!     }
//!     Ok(())
//! }
//! ```

/// Connection pool setup and configuration.
pub mod db;

/// Engine-wide error type.
pub mod errors;
pub use errors::{EngineError, EngineResult};

/// Tournament lifecycle and the close gate.
pub mod tournament;
pub use tournament::{TournamentManager, models::TABLE_SIZE};

/// Participant roster and numbering.
pub mod registry;
pub use registry::RegistryManager;

/// Per-round table/seat draws.
pub mod draw;
pub use draw::DrawManager;

/// Result capture and table validation.
pub mod results;
pub use results::ResultsManager;

/// Round and overall rankings.
pub mod scoring;
pub use scoring::ScoringManager;
