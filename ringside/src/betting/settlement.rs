//! Bet settlement.
//!
//! Eligibility is recomputed on every call from the current bets and cards:
//! a bet settles only while `pending`, on a `completed` card, against a bout
//! whose winner resolves to a boxer id. Bets pointing at missing cards or
//! bouts are filtered out.
//!
//! Settle-all hands the whole batch to a caller-supplied callback. Before
//! that, every bettor in the batch must have re-typed their state ID at the
//! desk.

use super::errors::{SettlementError, SettlementResult};
use super::models::{Bet, BetStatus};
use crate::auth::{Permission, Permissions};
use crate::fight_card::FightCard;
use crate::roster::BoxerId;
use crate::store::PayoutSettings;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use subtle::ConstantTimeEq;

/// A pending bet that can be settled now
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementCandidate {
    pub bet: Bet,
    pub winner_id: BoxerId,
    pub did_win: bool,
}

/// One entry of a settlement batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementInstruction {
    pub bet: Bet,
    pub winner_id: BoxerId,
    /// Audit note, carries the settlement date
    pub note: String,
}

impl SettlementInstruction {
    pub fn did_win(&self) -> bool {
        self.bet.fighter_id == self.winner_id
    }
}

/// Every pending bet whose bout has a declared winner on a completed card
pub fn eligible_bets(bets: &[Bet], cards: &[FightCard]) -> Vec<SettlementCandidate> {
    let cards: HashMap<&str, &FightCard> = cards.iter().map(|c| (c.id.as_str(), c)).collect();

    bets.iter()
        .filter(|bet| bet.is_pending())
        .filter_map(|bet| {
            let card = cards.get(bet.fight_card_id.as_str())?;
            if !card.is_completed() {
                return None;
            }
            let Some(winner_id) = card.bout(&bet.bout_id).and_then(|b| b.winner_id()) else {
                debug!("Bet {} has no decided bout yet", bet.id);
                return None;
            };

            Some(SettlementCandidate {
                did_win: bet.fighter_id == *winner_id,
                winner_id: winner_id.clone(),
                bet: bet.clone(),
            })
        })
        .collect()
}

/// Case-insensitive, constant-time state ID comparison
pub fn state_ids_match(stored: &str, typed: &str) -> bool {
    let stored = stored.trim().to_lowercase();
    let typed = typed.trim().to_lowercase();
    stored.as_bytes().ct_eq(typed.as_bytes()).into()
}

/// State IDs re-typed at the settlement desk, keyed by bettor id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateIdVerification {
    entries: HashMap<String, String>,
}

impl StateIdVerification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the state ID typed for a bettor
    pub fn enter(&mut self, bettor_id: impl Into<String>, state_id: impl Into<String>) {
        self.entries.insert(bettor_id.into(), state_id.into());
    }

    pub fn with(mut self, bettor_id: impl Into<String>, state_id: impl Into<String>) -> Self {
        self.enter(bettor_id, state_id);
        self
    }

    /// Whether the typed state ID matches the one stored on the bet
    pub fn is_verified(&self, bet: &Bet) -> bool {
        self.entries
            .get(&bet.bettor_id)
            .is_some_and(|typed| state_ids_match(&bet.bettor_state_id, typed))
    }

    /// Bettors of the batch still lacking a matching state ID, sorted
    pub fn unverified<'a>(&self, bets: impl IntoIterator<Item = &'a Bet>) -> Vec<String> {
        bets.into_iter()
            .filter(|bet| !self.is_verified(bet))
            .map(|bet| bet.bettor_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Audit note attached to every settled bet
fn settlement_note(winner_id: &str, now: DateTime<Utc>) -> String {
    format!(
        "Settled on {} (winner: {})",
        now.format("%Y-%m-%d %H:%M UTC"),
        winner_id
    )
}

/// Build the settlement batch.
///
/// # Errors
///
/// * `SettlementError::Permission` - `SettleBets` not granted
/// * `SettlementError::EmptyBatch` - nothing eligible
/// * `SettlementError::VerificationIncomplete` - some bettor unverified
pub fn prepare_settlement(
    permissions: &Permissions,
    bets: &[Bet],
    cards: &[FightCard],
    verification: &StateIdVerification,
    now: DateTime<Utc>,
) -> SettlementResult<Vec<SettlementInstruction>> {
    permissions.require(Permission::SettleBets)?;

    let candidates = eligible_bets(bets, cards);
    if candidates.is_empty() {
        return Err(SettlementError::EmptyBatch);
    }

    let unverified = verification.unverified(candidates.iter().map(|c| &c.bet));
    if !unverified.is_empty() {
        warn!("Settlement refused, {} bettors unverified", unverified.len());
        return Err(SettlementError::VerificationIncomplete { unverified });
    }

    Ok(candidates
        .into_iter()
        .map(|c| SettlementInstruction {
            note: settlement_note(&c.winner_id, now),
            winner_id: c.winner_id,
            bet: c.bet,
        })
        .collect())
}

/// Settle every eligible bet through `settle`.
///
/// The callback is invoked at most once, and never for an empty or
/// unverified batch.
pub fn settle_all<T, F>(
    permissions: &Permissions,
    bets: &[Bet],
    cards: &[FightCard],
    verification: &StateIdVerification,
    now: DateTime<Utc>,
    settle: F,
) -> SettlementResult<T>
where
    F: FnOnce(Vec<SettlementInstruction>) -> SettlementResult<T>,
{
    let batch = prepare_settlement(permissions, bets, cards, verification, now)?;
    info!("Settling {} bets", batch.len());
    settle(batch)
}

/// Final payout of a winning bet under the payout settings.
///
/// Tax and bonus apply to the profit only. Zero rates give exactly the
/// potential payout.
pub fn winning_payout(bet: &Bet, payout: &PayoutSettings) -> i64 {
    let profit = bet.potential_payout - bet.amount;
    let adjusted = profit as f64 * (1.0 - payout.tax_rate + payout.bonus_rate);
    bet.amount + adjusted.round().max(0.0) as i64
}

/// Resolve one instruction into the settled bet
pub fn apply_settlement(
    instruction: &SettlementInstruction,
    payout: &PayoutSettings,
    now: DateTime<Utc>,
) -> SettlementResult<Bet> {
    let bet = &instruction.bet;
    ensure_pending(bet)?;

    let mut settled = bet.clone();
    if instruction.did_win() {
        settled.status = BetStatus::Won;
        settled.actual_payout = Some(winning_payout(bet, payout));
    } else {
        settled.status = BetStatus::Lost;
        settled.actual_payout = Some(0);
    }
    settled.settled_date = Some(now);
    settled.settlement_note = Some(instruction.note.clone());
    Ok(settled)
}

fn ensure_pending(bet: &Bet) -> SettlementResult<()> {
    if bet.is_pending() {
        Ok(())
    } else {
        Err(SettlementError::BetNotPending {
            bet_id: bet.id.clone(),
            status: bet.status,
        })
    }
}

/// Void a pending bet without payout
pub fn cancel_bet(bet: &Bet, reason: &str, now: DateTime<Utc>) -> SettlementResult<Bet> {
    ensure_pending(bet)?;

    let mut cancelled = bet.clone();
    cancelled.status = BetStatus::Cancelled;
    cancelled.actual_payout = Some(0);
    cancelled.settled_date = Some(now);
    cancelled.settlement_note = Some(format!("Cancelled: {reason}"));
    Ok(cancelled)
}

/// Void a pending bet and return the stake
pub fn refund_bet(bet: &Bet, reason: &str, now: DateTime<Utc>) -> SettlementResult<Bet> {
    ensure_pending(bet)?;

    let mut refunded = bet.clone();
    refunded.status = BetStatus::Refunded;
    refunded.actual_payout = Some(bet.amount);
    refunded.settled_date = Some(now);
    refunded.settlement_note = Some(format!("Refunded: {reason}"));
    Ok(refunded)
}
