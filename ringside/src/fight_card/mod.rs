//! Fight cards, bouts and result declaration.
//!
//! A card moves `upcoming -> completed` exactly once, when its results are
//! declared. Declaring results also updates the boxers' win/loss/knockout
//! records.

pub mod errors;
pub mod manager;
pub mod models;
pub mod results;

pub use errors::{ResultsError, ResultsResult};
pub use manager::FightCardManager;
pub use models::{Bout, BoutId, CardStatus, Corner, FightCard, FightCardId};
pub use results::{BoutDecision, ResultDeclaration, declare_results};
