//! Betting data models.

use crate::fight_card::{Bout, BoutId, Corner, FightCardId};
use crate::roster::BoxerId;
use crate::store::{Document, containers};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bet ID type
pub type BetId = String;

/// Betting pool ID type
pub type PoolId = String;

/// Bet status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    #[default]
    Pending,
    Won,
    Lost,
    Cancelled,
    Refunded,
}

impl BetStatus {
    /// Whether the bet can still change
    pub fn is_pending(self) -> bool {
        self == BetStatus::Pending
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetStatus::Pending => write!(f, "pending"),
            BetStatus::Won => write!(f, "won"),
            BetStatus::Lost => write!(f, "lost"),
            BetStatus::Cancelled => write!(f, "cancelled"),
            BetStatus::Refunded => write!(f, "refunded"),
        }
    }
}

/// A wager on one fighter of one bout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub id: BetId,
    pub bettor_id: String,
    pub bettor_name: String,
    /// State identifier as given by the bettor at placement
    pub bettor_state_id: String,
    pub fight_card_id: FightCardId,
    pub bout_id: BoutId,
    pub fighter_id: BoxerId,
    pub fighter_name: String,
    pub opponent_name: String,
    /// Stake, minor currency units
    pub amount: i64,
    /// Decimal odds at placement
    pub odds: f64,
    pub potential_payout: i64,
    #[serde(default)]
    pub status: BetStatus,
    pub placed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settled_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_payout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement_note: Option<String>,
}

impl Bet {
    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }
}

impl Document for Bet {
    const CONTAINER: &'static str = containers::BETS;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Betting pool status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolStatus {
    #[default]
    Open,
    Locked,
    Settled,
}

impl fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolStatus::Open => write!(f, "open"),
            PoolStatus::Locked => write!(f, "locked"),
            PoolStatus::Settled => write!(f, "settled"),
        }
    }
}

/// Pool sizes and implied probabilities for one bout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FightOdds {
    pub bout_id: BoutId,
    pub fighter1_id: BoxerId,
    pub fighter2_id: BoxerId,
    pub fighter1_pool: i64,
    pub fighter2_pool: i64,
    pub fighter1_probability: f64,
    pub fighter2_probability: f64,
    pub last_updated: DateTime<Utc>,
}

impl FightOdds {
    /// Even odds for a bout with both corners filled, `None` otherwise
    pub fn for_bout(bout: &Bout, now: DateTime<Utc>) -> Option<Self> {
        Some(Self {
            bout_id: bout.id.clone(),
            fighter1_id: bout.fighter1_id.clone()?,
            fighter2_id: bout.fighter2_id.clone()?,
            fighter1_pool: 0,
            fighter2_pool: 0,
            fighter1_probability: 0.5,
            fighter2_probability: 0.5,
            last_updated: now,
        })
    }

    pub fn includes(&self, boxer_id: &str) -> bool {
        self.corner_of(boxer_id).is_some()
    }

    pub fn corner_of(&self, boxer_id: &str) -> Option<Corner> {
        if self.fighter1_id == boxer_id {
            Some(Corner::Fighter1)
        } else if self.fighter2_id == boxer_id {
            Some(Corner::Fighter2)
        } else {
            None
        }
    }

    pub fn probability(&self, corner: Corner) -> f64 {
        match corner {
            Corner::Fighter1 => self.fighter1_probability,
            Corner::Fighter2 => self.fighter2_probability,
        }
    }

    pub fn pool(&self, corner: Corner) -> i64 {
        match corner {
            Corner::Fighter1 => self.fighter1_pool,
            Corner::Fighter2 => self.fighter2_pool,
        }
    }

    pub(crate) fn pool_mut(&mut self, corner: Corner) -> &mut i64 {
        match corner {
            Corner::Fighter1 => &mut self.fighter1_pool,
            Corner::Fighter2 => &mut self.fighter2_pool,
        }
    }

    pub fn total(&self) -> i64 {
        self.fighter1_pool + self.fighter2_pool
    }
}

/// Per-card aggregate of bout odds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingPool {
    pub id: PoolId,
    pub fight_card_id: FightCardId,
    pub fights: Vec<FightOdds>,
    pub total_pool: i64,
    #[serde(default)]
    pub status: PoolStatus,
}

impl BettingPool {
    /// Conventional pool id for a card
    pub fn id_for_card(card_id: &str) -> PoolId {
        format!("pool-{card_id}")
    }

    pub fn fight(&self, bout_id: &str) -> Option<&FightOdds> {
        self.fights.iter().find(|f| f.bout_id == bout_id)
    }
}

impl Document for BettingPool {
    const CONTAINER: &'static str = containers::BETTING_POOLS;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Odds display convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsFormat {
    #[default]
    American,
    Decimal,
    Fractional,
}

impl fmt::Display for OddsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OddsFormat::American => write!(f, "american"),
            OddsFormat::Decimal => write!(f, "decimal"),
            OddsFormat::Fractional => write!(f, "fractional"),
        }
    }
}

impl FromStr for OddsFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "american" => Ok(OddsFormat::American),
            "decimal" => Ok(OddsFormat::Decimal),
            "fractional" => Ok(OddsFormat::Fractional),
            other => Err(format!("Unknown odds format: {other}")),
        }
    }
}

/// Current odds for one side of a bout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsQuote {
    pub odds: String,
    pub probability: f64,
    pub format: OddsFormat,
}

/// Bet placement request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetSlip {
    pub bettor_id: String,
    pub bettor_name: String,
    pub bettor_state_id: String,
    pub fight_card_id: FightCardId,
    pub bout_id: BoutId,
    pub fighter_id: BoxerId,
    pub amount: i64,
}
