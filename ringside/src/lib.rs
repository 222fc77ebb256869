//! # Ringside
//!
//! Core of a boxing association's management system: tournament brackets,
//! fight results, and a betting desk with settlement.
//!
//! The engines are synchronous functions over snapshots. Each takes the
//! documents it needs and returns whole new copies, never mutating its inputs.
//! Async managers wrap them with the load -> compute -> persist cycle against
//! a [`store::DocumentStore`].
//!
//! ## Core Modules
//!
//! - [`tournament`]: 32-slot single-elimination brackets, seeding and advancement
//! - [`fight_card`]: fight cards, bouts and result declaration
//! - [`betting`]: betting pools, odds, bet placement and settlement
//! - [`roster`]: registered boxers and their records
//! - [`auth`]: role-based permission capabilities
//! - [`store`]: JSON document storage (in-memory and PostgreSQL) and settings
//!
//! ## Example
//!
//! ```
//! use ringside::betting::{OddsFormat, format_odds, implied_probabilities};
//!
//! let (favorite, underdog) = implied_probabilities(3_000, 1_000);
//! assert_eq!(format_odds(favorite, OddsFormat::American), "-300");
//! assert_eq!(format_odds(underdog, OddsFormat::Decimal), "4.00");
//! ```

/// Role-based permission capabilities.
pub mod auth;

/// Betting pools, odds and settlement.
pub mod betting;

/// Fight cards and result declaration.
pub mod fight_card;

/// Registered boxers.
pub mod roster;

/// Document storage backends and singleton settings.
pub mod store;

/// Tournament brackets.
pub mod tournament;

pub use auth::{Permission, Permissions, Role};
pub use betting::{BettingManager, OddsFormat};
pub use fight_card::FightCardManager;
pub use store::{DocumentStore, InMemoryStore};
pub use tournament::TournamentManager;
