//! Betting pools, odds and settlement.
//!
//! Pure functions in [`odds`], [`pool`] and [`settlement`] take snapshots and
//! return new values. [`BettingManager`] loads those snapshots from a
//! [`DocumentStore`](crate::store::DocumentStore) and persists the results.

pub mod errors;
pub mod manager;
pub mod models;
pub mod odds;
pub mod pool;
pub mod settlement;

pub use errors::{BettingError, BettingResult, SettlementError, SettlementResult};
pub use manager::BettingManager;
pub use models::{
    Bet, BetId, BetSlip, BetStatus, BettingPool, FightOdds, OddsFormat, OddsQuote, PoolId,
    PoolStatus,
};
pub use odds::{
    american_odds, decimal_odds, fighter_current_odds, format_odds, fractional_odds,
    implied_probabilities, potential_payout,
};
pub use settlement::{
    SettlementCandidate, SettlementInstruction, StateIdVerification, apply_settlement,
    cancel_bet, eligible_bets, prepare_settlement, refund_bet, settle_all, state_ids_match,
};
