//! Implied probabilities and odds formatting.
//!
//! Probabilities come from pool shares and are clamped to
//! `[MIN_PROBABILITY, MAX_PROBABILITY]` so every format stays finite. A side
//! with probability above one half is the favorite: negative American odds
//! and decimal odds below 2.0. Higher probability always gives strictly
//! shorter [`decimal_odds`] and [`american_odds`]. Fractional odds are quoted
//! in hundredths, so close probabilities can share a quote.

use super::models::{BettingPool, OddsFormat, OddsQuote};

pub const MIN_PROBABILITY: f64 = 0.01;
pub const MAX_PROBABILITY: f64 = 0.99;

fn clamp_probability(probability: f64) -> f64 {
    if probability.is_nan() {
        return 0.5;
    }
    probability.clamp(MIN_PROBABILITY, MAX_PROBABILITY)
}

/// Implied win probabilities for the two corners of a bout
pub fn implied_probabilities(fighter1_pool: i64, fighter2_pool: i64) -> (f64, f64) {
    let total = fighter1_pool.max(0) + fighter2_pool.max(0);
    if total == 0 {
        return (0.5, 0.5);
    }

    let p1 = clamp_probability(fighter1_pool.max(0) as f64 / total as f64);
    (p1, 1.0 - p1)
}

/// Fair decimal odds (total return per unit staked)
pub fn decimal_odds(probability: f64) -> f64 {
    1.0 / clamp_probability(probability)
}

/// Fair American odds
pub fn american_odds(probability: f64) -> f64 {
    let p = clamp_probability(probability);
    if p > 0.5 {
        -(p / (1.0 - p)) * 100.0
    } else {
        ((1.0 - p) / p) * 100.0
    }
}

/// Fractional odds as a reduced `(numerator, denominator)` pair.
///
/// The profit ratio is rounded to hundredths before reducing, so the quote
/// never lengthens as probability rises but probabilities within the same
/// hundredth (0.6 and 0.6001 both give `67/100`) share one quote.
pub fn fractional_odds(probability: f64) -> (u64, u64) {
    let p = clamp_probability(probability);
    let numerator = (((1.0 - p) / p) * 100.0).round().max(1.0) as u64;
    let divisor = gcd(numerator, 100);
    (numerator / divisor, 100 / divisor)
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Render a probability in the requested display convention
pub fn format_odds(probability: f64, format: OddsFormat) -> String {
    match format {
        OddsFormat::American => format!("{:+}", american_odds(probability).round() as i64),
        OddsFormat::Decimal => format!("{:.2}", decimal_odds(probability)),
        OddsFormat::Fractional => {
            let (numerator, denominator) = fractional_odds(probability);
            format!("{numerator}/{denominator}")
        }
    }
}

/// Payout for a winning stake at the given decimal odds, stake included
pub fn potential_payout(amount: i64, decimal_odds: f64) -> i64 {
    (amount as f64 * decimal_odds).round() as i64
}

/// Current odds for a boxer on a card.
///
/// Returns `None` while odds are pending: no pool for the card yet, or the
/// boxer is in none of the pool's bouts.
pub fn fighter_current_odds(
    boxer_id: &str,
    fight_card_id: &str,
    pools: &[BettingPool],
    format: OddsFormat,
) -> Option<OddsQuote> {
    let pool = pools.iter().find(|p| p.fight_card_id == fight_card_id)?;
    let fight = pool.fights.iter().find(|f| f.includes(boxer_id))?;
    let probability = fight.probability(fight.corner_of(boxer_id)?);

    Some(OddsQuote {
        odds: format_odds(probability, format),
        probability,
        format,
    })
}
