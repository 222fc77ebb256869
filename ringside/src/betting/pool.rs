//! Pool lifecycle and bet placement.

use super::errors::{BettingError, BettingResult};
use super::models::{Bet, BetId, BetSlip, BetStatus, BettingPool, FightOdds, PoolStatus};
use super::odds::{decimal_odds, implied_probabilities, potential_payout};
use crate::fight_card::FightCard;
use chrono::{DateTime, Utc};
use log::{debug, info};

/// Open a pool for every bout of a card that has both corners filled
pub fn open_pool(card: &FightCard, now: DateTime<Utc>) -> BettingResult<BettingPool> {
    if card.is_completed() {
        return Err(BettingError::CardCompleted(card.id.clone()));
    }

    let fights: Vec<FightOdds> = card
        .bouts()
        .filter_map(|bout| FightOdds::for_bout(bout, now))
        .collect();

    debug!("Opening pool for card {} with {} bouts", card.id, fights.len());
    Ok(BettingPool {
        id: BettingPool::id_for_card(&card.id),
        fight_card_id: card.id.clone(),
        fights,
        total_pool: 0,
        status: PoolStatus::Open,
    })
}

/// Move a pool along `open -> locked -> settled`
pub fn transition(pool: &BettingPool, to: PoolStatus) -> BettingResult<BettingPool> {
    let allowed = matches!(
        (pool.status, to),
        (PoolStatus::Open, PoolStatus::Locked) | (PoolStatus::Locked, PoolStatus::Settled)
    );
    if !allowed {
        return Err(BettingError::InvalidTransition {
            from: pool.status,
            to,
        });
    }

    info!("Pool {} {} -> {}", pool.id, pool.status, to);
    let mut updated = pool.clone();
    updated.status = to;
    Ok(updated)
}

/// Place a bet against an open pool.
///
/// The bet records the decimal odds in force before its own stake is added.
/// Returns the new bet and the pool with its sizes and probabilities
/// recomputed.
///
/// # Errors
///
/// * `BettingError::InvalidAmount` - amount is not positive
/// * `BettingError::PoolNotOpen` - pool is locked or settled
/// * `BettingError::CardCompleted` - card results already declared
/// * `BettingError::BoutNotInPool` - bout missing from the pool or the card
/// * `BettingError::FighterNotInBout` - chosen boxer is not in the bout
pub fn place_bet(
    pool: &BettingPool,
    card: &FightCard,
    slip: &BetSlip,
    bet_id: BetId,
    now: DateTime<Utc>,
) -> BettingResult<(Bet, BettingPool)> {
    if slip.amount <= 0 {
        return Err(BettingError::InvalidAmount(slip.amount));
    }
    if pool.status != PoolStatus::Open {
        return Err(BettingError::PoolNotOpen {
            pool_id: pool.id.clone(),
            status: pool.status,
        });
    }
    if card.is_completed() {
        return Err(BettingError::CardCompleted(card.id.clone()));
    }

    let bout = card
        .bout(&slip.bout_id)
        .ok_or_else(|| BettingError::BoutNotInPool(slip.bout_id.clone()))?;

    let mut updated = pool.clone();
    let fight = updated
        .fights
        .iter_mut()
        .find(|f| f.bout_id == slip.bout_id)
        .ok_or_else(|| BettingError::BoutNotInPool(slip.bout_id.clone()))?;

    let corner = fight
        .corner_of(&slip.fighter_id)
        .ok_or_else(|| BettingError::FighterNotInBout {
            fighter_id: slip.fighter_id.clone(),
            bout_id: slip.bout_id.clone(),
        })?;

    let odds = decimal_odds(fight.probability(corner));

    *fight.pool_mut(corner) += slip.amount;
    let (p1, p2) = implied_probabilities(fight.fighter1_pool, fight.fighter2_pool);
    fight.fighter1_probability = p1;
    fight.fighter2_probability = p2;
    fight.last_updated = now;
    updated.total_pool = updated.fights.iter().map(FightOdds::total).sum();

    let name_or_id = |c| {
        bout.fighter_name(c)
            .map(str::to_string)
            .or_else(|| bout.fighter(c).cloned())
            .unwrap_or_default()
    };

    let bet = Bet {
        id: bet_id,
        bettor_id: slip.bettor_id.clone(),
        bettor_name: slip.bettor_name.clone(),
        bettor_state_id: slip.bettor_state_id.clone(),
        fight_card_id: card.id.clone(),
        bout_id: slip.bout_id.clone(),
        fighter_id: slip.fighter_id.clone(),
        fighter_name: name_or_id(corner),
        opponent_name: name_or_id(corner.opposite()),
        amount: slip.amount,
        odds,
        potential_payout: potential_payout(slip.amount, odds),
        status: BetStatus::Pending,
        placed_at: now,
        settled_date: None,
        actual_payout: None,
        settlement_note: None,
    };

    info!(
        "Bet {} placed: {} on {} at {:.2}",
        bet.id, bet.amount, bet.fighter_id, bet.odds
    );
    Ok((bet, updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fight_card::{Bout, CardStatus};

    fn card() -> FightCard {
        let mut main = Bout::new("main", "a", "b");
        main.fighter1_name = Some("Alvarez".into());
        FightCard::new("card-1", "Fight Night", main)
            .with_undercard(Bout::new("u1", "c", "d"))
    }

    fn slip(fighter: &str, amount: i64) -> BetSlip {
        BetSlip {
            bettor_id: "bettor-1".into(),
            bettor_name: "Pat".into(),
            bettor_state_id: "S123".into(),
            fight_card_id: "card-1".into(),
            bout_id: "main".into(),
            fighter_id: fighter.into(),
            amount,
        }
    }

    #[test]
    fn test_open_pool_covers_bouts() {
        let pool = open_pool(&card(), Utc::now()).unwrap();
        assert_eq!(pool.id, "pool-card-1");
        assert_eq!(pool.fights.len(), 2);
        assert_eq!(pool.status, PoolStatus::Open);
    }

    #[test]
    fn test_open_pool_rejects_completed_card() {
        let mut card = card();
        card.status = CardStatus::Completed;
        assert!(matches!(
            open_pool(&card, Utc::now()),
            Err(BettingError::CardCompleted(_))
        ));
    }

    #[test]
    fn test_place_bet_updates_pool() {
        let card = card();
        let pool = open_pool(&card, Utc::now()).unwrap();

        let (bet, pool) =
            place_bet(&pool, &card, &slip("a", 3_000), "bet-1".into(), Utc::now()).unwrap();
        assert_eq!(bet.odds, 2.0);
        assert_eq!(bet.potential_payout, 6_000);
        assert_eq!(bet.fighter_name, "Alvarez");
        assert_eq!(bet.opponent_name, "b");
        assert_eq!(pool.total_pool, 3_000);

        let (second, pool) =
            place_bet(&pool, &card, &slip("b", 1_000), "bet-2".into(), Utc::now()).unwrap();
        // b was priced against a one-sided pool
        assert!(second.odds > 2.0);

        let fight = pool.fight("main").unwrap();
        assert!((fight.fighter1_probability - 0.75).abs() < 1e-9);
        assert_eq!(pool.total_pool, 4_000);
    }

    #[test]
    fn test_place_bet_validation() {
        let card = card();
        let pool = open_pool(&card, Utc::now()).unwrap();

        assert!(matches!(
            place_bet(&pool, &card, &slip("a", 0), "x".into(), Utc::now()),
            Err(BettingError::InvalidAmount(0))
        ));
        assert!(matches!(
            place_bet(&pool, &card, &slip("c", 100), "x".into(), Utc::now()),
            Err(BettingError::FighterNotInBout { .. })
        ));

        let mut other = slip("a", 100);
        other.bout_id = "nope".into();
        assert!(matches!(
            place_bet(&pool, &card, &other, "x".into(), Utc::now()),
            Err(BettingError::BoutNotInPool(_))
        ));

        let locked = transition(&pool, PoolStatus::Locked).unwrap();
        assert!(matches!(
            place_bet(&locked, &card, &slip("a", 100), "x".into(), Utc::now()),
            Err(BettingError::PoolNotOpen { .. })
        ));
    }

    #[test]
    fn test_pool_transitions() {
        let pool = open_pool(&card(), Utc::now()).unwrap();
        assert!(transition(&pool, PoolStatus::Settled).is_err());

        let locked = transition(&pool, PoolStatus::Locked).unwrap();
        let settled = transition(&locked, PoolStatus::Settled).unwrap();
        assert_eq!(settled.status, PoolStatus::Settled);
        assert!(transition(&settled, PoolStatus::Open).is_err());
    }
}
