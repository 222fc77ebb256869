//! Single-elimination tournaments for the top 32 ranked boxers.
//!
//! This module provides:
//! - Seed selection (ranking points, then wins, then losses)
//! - Ranked and random round-1 ordering
//! - A fixed 31-match bracket arena with structural winner propagation
//! - Bye handling for rosters of 16 to 31 boxers
//!
//! ## Example
//!
//! ```
//! use ringside::roster::Boxer;
//! use ringside::tournament::{SeedingMethod, TournamentStatus, advance_winner, create_tournament_bracket, seeded_order};
//!
//! let boxers: Vec<Boxer> = (0..32)
//!     .map(|i| Boxer::new(format!("b{i}"), format!("S-{i}"), format!("Boxer {i}")).with_ranking_points(100 - i))
//!     .collect();
//!
//! let order = seeded_order(&boxers);
//! let bracket = create_tournament_bracket(&order, SeedingMethod::Ranked, "Golden Gloves").unwrap();
//! assert_eq!(bracket.matches.len(), 31);
//!
//! let bracket = advance_winner(&bracket, "match-1", "b0").unwrap();
//! assert_eq!(bracket.status, TournamentStatus::Active);
//! ```

pub mod bracket;
pub mod errors;
pub mod manager;
pub mod models;
pub mod seeding;

pub use bracket::{MIN_ENTRANTS, advance_winner, create_tournament_bracket, validate_structure};
pub use errors::{TournamentError, TournamentResult};
pub use manager::TournamentManager;
pub use models::{
    Advancement, BRACKET_SIZE, Entrant, MATCH_COUNT, MatchIndex, MatchStatus, SeedingMethod,
    TOTAL_ROUNDS, Tournament, TournamentId, TournamentMatch, TournamentStatus, match_id,
};
pub use seeding::{SEED_ORDER, bracket_order, random_order, rank_boxers, seeded_order, top_32};
