//! Betting manager: pools, bets and settlement against the document store.

use super::errors::{BettingError, BettingResult, SettlementError, SettlementResult};
use super::models::{Bet, BetSlip, BettingPool, OddsFormat, OddsQuote, PoolStatus};
use super::odds::fighter_current_odds;
use super::pool;
use super::settlement::{self, SettlementCandidate, StateIdVerification};
use crate::auth::{Permission, Permissions};
use crate::fight_card::FightCard;
use crate::store::{self, AppSettings, DocumentStore, PayoutSettings, StoreError, load_settings};
use chrono::Utc;
use log::{info, warn};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Betting manager
#[derive(Clone)]
pub struct BettingManager {
    store: Arc<dyn DocumentStore>,
    /// Serializes pool updates and settlement
    write_lock: Arc<Mutex<()>>,
}

impl BettingManager {
    /// Create a new betting manager
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn load_card(&self, card_id: &str) -> BettingResult<FightCard> {
        store::fetch(self.store.as_ref(), card_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => BettingError::CardNotFound(card_id.to_string()),
                other => other.into(),
            })
    }

    async fn find_pool(&self, card_id: &str) -> BettingResult<Option<BettingPool>> {
        match store::fetch(self.store.as_ref(), &BettingPool::id_for_card(card_id)).await {
            Ok(pool) => Ok(Some(pool)),
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the pool of a card
    pub async fn pool_for_card(&self, card_id: &str) -> BettingResult<BettingPool> {
        self.find_pool(card_id)
            .await?
            .ok_or_else(|| BettingError::PoolNotFound(card_id.to_string()))
    }

    /// Open the betting pool of an upcoming card
    pub async fn open_pool(
        &self,
        permissions: &Permissions,
        card_id: &str,
    ) -> BettingResult<BettingPool> {
        permissions.require(Permission::ManageBetting)?;
        let _guard = self.write_lock.lock().await;

        if self.find_pool(card_id).await?.is_some() {
            return Err(BettingError::PoolAlreadyExists(card_id.to_string()));
        }

        let card = self.load_card(card_id).await?;
        let pool = pool::open_pool(&card, Utc::now())?;
        store::insert(self.store.as_ref(), &pool).await?;

        info!("Opened betting pool {}", pool.id);
        Ok(pool)
    }

    /// Stop taking bets on a card
    pub async fn lock_pool(
        &self,
        permissions: &Permissions,
        card_id: &str,
    ) -> BettingResult<BettingPool> {
        permissions.require(Permission::ManageBetting)?;
        let _guard = self.write_lock.lock().await;

        let current = self.pool_for_card(card_id).await?;
        let locked = pool::transition(&current, PoolStatus::Locked)?;
        store::replace(self.store.as_ref(), &locked).await?;
        Ok(locked)
    }

    /// Current odds for a boxer, `None` while pending.
    ///
    /// Without an explicit format the association's default is used.
    pub async fn current_odds(
        &self,
        boxer_id: &str,
        card_id: &str,
        format: Option<OddsFormat>,
    ) -> BettingResult<Option<OddsQuote>> {
        let format = match format {
            Some(format) => format,
            None => {
                load_settings::<AppSettings>(self.store.as_ref())
                    .await?
                    .default_odds_format
            }
        };

        let pools: Vec<BettingPool> = self.find_pool(card_id).await?.into_iter().collect();
        Ok(fighter_current_odds(boxer_id, card_id, &pools, format))
    }

    /// Place a bet and persist it together with the updated pool
    ///
    /// # Errors
    ///
    /// * `BettingError::BettingDisabled` - switched off in app settings
    /// * `BettingError::StakeOutOfRange` - amount outside the configured limits
    /// * any placement error of the pool
    pub async fn place_bet(&self, permissions: &Permissions, slip: &BetSlip) -> BettingResult<Bet> {
        permissions.require(Permission::PlaceBets)?;

        let settings: AppSettings = load_settings(self.store.as_ref()).await?;
        if !settings.betting_enabled {
            return Err(BettingError::BettingDisabled);
        }
        if slip.amount <= 0 {
            return Err(BettingError::InvalidAmount(slip.amount));
        }
        if slip.amount < settings.min_bet || slip.amount > settings.max_bet {
            return Err(BettingError::StakeOutOfRange {
                amount: slip.amount,
                min: settings.min_bet,
                max: settings.max_bet,
            });
        }

        let _guard = self.write_lock.lock().await;

        let card = self.load_card(&slip.fight_card_id).await?;
        let current = self.pool_for_card(&slip.fight_card_id).await?;
        let bet_id = format!("bet-{}", Uuid::new_v4());

        let (bet, updated) = pool::place_bet(&current, &card, slip, bet_id, Utc::now())?;
        store::insert(self.store.as_ref(), &bet).await?;
        store::replace(self.store.as_ref(), &updated).await?;

        Ok(bet)
    }

    /// Get bet by ID
    pub async fn get_bet(&self, bet_id: &str) -> SettlementResult<Bet> {
        store::fetch(self.store.as_ref(), bet_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => SettlementError::BetNotFound(bet_id.to_string()),
                other => other.into(),
            })
    }

    /// Bets that can be settled right now, with their outcome
    pub async fn pending_settlements(&self) -> SettlementResult<Vec<SettlementCandidate>> {
        let bets: Vec<Bet> = store::fetch_all(self.store.as_ref()).await?;
        let cards: Vec<FightCard> = store::fetch_all(self.store.as_ref()).await?;
        Ok(settlement::eligible_bets(&bets, &cards))
    }

    /// Settle every eligible bet and persist the results.
    ///
    /// Pools whose card has no pending bets left are moved to `settled`.
    pub async fn settle_all(
        &self,
        permissions: &Permissions,
        verification: &StateIdVerification,
    ) -> SettlementResult<Vec<Bet>> {
        let _guard = self.write_lock.lock().await;

        let bets: Vec<Bet> = store::fetch_all(self.store.as_ref()).await?;
        let cards: Vec<FightCard> = store::fetch_all(self.store.as_ref()).await?;
        let payout: PayoutSettings = load_settings(self.store.as_ref()).await?;
        let now = Utc::now();

        let settled = settlement::settle_all(permissions, &bets, &cards, verification, now, |batch| {
            batch
                .iter()
                .map(|instruction| settlement::apply_settlement(instruction, &payout, now))
                .collect::<SettlementResult<Vec<Bet>>>()
        })?;

        for bet in &settled {
            store::replace(self.store.as_ref(), bet).await?;
        }

        let settled_ids: BTreeSet<&str> = settled.iter().map(|b| b.id.as_str()).collect();
        let card_ids: BTreeSet<&str> = settled.iter().map(|b| b.fight_card_id.as_str()).collect();
        for card_id in card_ids {
            let still_pending = bets.iter().any(|b| {
                b.fight_card_id == card_id && b.is_pending() && !settled_ids.contains(b.id.as_str())
            });
            if still_pending {
                continue;
            }
            self.close_pool(card_id).await?;
        }

        info!("Settled {} bets", settled.len());
        Ok(settled)
    }

    /// Walk a card's pool through to `settled`
    async fn close_pool(&self, card_id: &str) -> SettlementResult<()> {
        let Some(mut current) = self.find_pool(card_id).await? else {
            return Ok(());
        };
        if current.status == PoolStatus::Open {
            current = pool::transition(&current, PoolStatus::Locked)?;
        }
        match pool::transition(&current, PoolStatus::Settled) {
            Ok(settled) => store::replace(self.store.as_ref(), &settled).await?,
            Err(e) => warn!("Pool for card {card_id} not settled: {e}"),
        }
        Ok(())
    }

    /// Cancel a pending bet without payout
    pub async fn cancel_bet(
        &self,
        permissions: &Permissions,
        bet_id: &str,
        reason: &str,
    ) -> SettlementResult<Bet> {
        permissions.require(Permission::ManageBetting)?;
        let _guard = self.write_lock.lock().await;

        let bet = self.get_bet(bet_id).await?;
        let cancelled = settlement::cancel_bet(&bet, reason, Utc::now())?;
        store::replace(self.store.as_ref(), &cancelled).await?;
        Ok(cancelled)
    }

    /// Refund the stake of a pending bet
    pub async fn refund_bet(
        &self,
        permissions: &Permissions,
        bet_id: &str,
        reason: &str,
    ) -> SettlementResult<Bet> {
        permissions.require(Permission::ManageBetting)?;
        let _guard = self.write_lock.lock().await;

        let bet = self.get_bet(bet_id).await?;
        let refunded = settlement::refund_bet(&bet, reason, Utc::now())?;
        store::replace(self.store.as_ref(), &refunded).await?;
        Ok(refunded)
    }
}
