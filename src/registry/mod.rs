//! Participant registry module.
//!
//! Owns participant identity and the numbering invariants:
//! - Lowest-free-number assignment on add/quick-add
//! - Gap-preserving removal with optional immediate renumber
//! - Explicit renumber-all / renumber-from batch rewrites
//! - Gap check as a pure read
//! - Address swap with trade/replace semantics
//!
//! ## Example
//!
//! ```no_run
//! use skat_tourney::registry::RegistryManager;
//! use skat_tourney::db::Database;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let registry = RegistryManager::new(Arc::new(db.pool().clone()));
//!
//!     let participant = registry.add(1, 42).await?;
//!     println!("Assigned number {}", participant.player_no);
//!
//!     let gaps = registry.check_gaps(1).await?;
//!     println!("Missing numbers: {gaps:?}");
//!     Ok(())
//! }
//! ```

pub mod manager;
pub mod models;
pub mod numbering;

pub use manager::RegistryManager;
pub use models::{AddressId, NewAddress, Participant, ParticipantId, SwapOutcome, display_label};
pub use numbering::{Renumbering, find_gaps, next_free_number, renumber_all_plan, renumber_from_plan};
