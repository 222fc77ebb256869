//! Fight card and bout data models.

use crate::roster::BoxerId;
use crate::store::{Document, containers};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fight card ID type
pub type FightCardId = String;

/// Bout ID type
pub type BoutId = String;

/// One side of a two-fighter match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    #[serde(rename = "fighter1")]
    Fighter1,
    #[serde(rename = "fighter2")]
    Fighter2,
}

impl Corner {
    pub fn opposite(self) -> Self {
        match self {
            Corner::Fighter1 => Corner::Fighter2,
            Corner::Fighter2 => Corner::Fighter1,
        }
    }
}

impl std::fmt::Display for Corner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Corner::Fighter1 => write!(f, "fighter1"),
            Corner::Fighter2 => write!(f, "fighter2"),
        }
    }
}

/// Fight card lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    #[default]
    Upcoming,
    Completed,
}

/// A single scheduled match on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bout {
    pub id: BoutId,
    pub fighter1_id: Option<BoxerId>,
    pub fighter2_id: Option<BoxerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fighter1_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fighter2_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_class: Option<String>,
    #[serde(default)]
    pub winner: Option<Corner>,
    #[serde(default)]
    pub knockout: bool,
}

impl Bout {
    /// Bout between two registered boxers, undecided
    pub fn new(id: impl Into<BoutId>, fighter1_id: impl Into<BoxerId>, fighter2_id: impl Into<BoxerId>) -> Self {
        Self {
            id: id.into(),
            fighter1_id: Some(fighter1_id.into()),
            fighter2_id: Some(fighter2_id.into()),
            fighter1_name: None,
            fighter2_name: None,
            weight_class: None,
            winner: None,
            knockout: false,
        }
    }

    /// Boxer in the given corner, if assigned
    pub fn fighter(&self, corner: Corner) -> Option<&BoxerId> {
        match corner {
            Corner::Fighter1 => self.fighter1_id.as_ref(),
            Corner::Fighter2 => self.fighter2_id.as_ref(),
        }
    }

    /// Display name of the boxer in the given corner
    pub fn fighter_name(&self, corner: Corner) -> Option<&str> {
        match corner {
            Corner::Fighter1 => self.fighter1_name.as_deref(),
            Corner::Fighter2 => self.fighter2_name.as_deref(),
        }
    }

    /// Corner the boxer fights from, if they are on this bout
    pub fn corner_of(&self, boxer_id: &str) -> Option<Corner> {
        if self.fighter1_id.as_deref() == Some(boxer_id) {
            Some(Corner::Fighter1)
        } else if self.fighter2_id.as_deref() == Some(boxer_id) {
            Some(Corner::Fighter2)
        } else {
            None
        }
    }

    pub fn includes(&self, boxer_id: &str) -> bool {
        self.corner_of(boxer_id).is_some()
    }

    /// Declared winner resolved to a boxer id
    pub fn winner_id(&self) -> Option<&BoxerId> {
        self.winner.and_then(|corner| self.fighter(corner))
    }

    /// Declared loser resolved to a boxer id
    pub fn loser_id(&self) -> Option<&BoxerId> {
        self.winner.and_then(|corner| self.fighter(corner.opposite()))
    }
}

/// Event grouping bouts under one main event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FightCard {
    pub id: FightCardId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    pub main_event: Bout,
    #[serde(default)]
    pub co_main_event: Option<Bout>,
    #[serde(default)]
    pub other_bouts: Vec<Bout>,
    #[serde(default)]
    pub status: CardStatus,
}

impl FightCard {
    /// Upcoming card with only a main event
    pub fn new(id: impl Into<FightCardId>, title: impl Into<String>, main_event: Bout) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            venue: None,
            date: None,
            main_event,
            co_main_event: None,
            other_bouts: Vec::new(),
            status: CardStatus::Upcoming,
        }
    }

    pub fn with_co_main(mut self, bout: Bout) -> Self {
        self.co_main_event = Some(bout);
        self
    }

    pub fn with_undercard(mut self, bout: Bout) -> Self {
        self.other_bouts.push(bout);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == CardStatus::Completed
    }

    /// All bouts in billing order: main, co-main, then the rest
    pub fn bouts(&self) -> impl Iterator<Item = &Bout> {
        std::iter::once(&self.main_event)
            .chain(self.co_main_event.iter())
            .chain(self.other_bouts.iter())
    }

    pub fn bouts_mut(&mut self) -> impl Iterator<Item = &mut Bout> {
        std::iter::once(&mut self.main_event)
            .chain(self.co_main_event.iter_mut())
            .chain(self.other_bouts.iter_mut())
    }

    pub fn bout(&self, bout_id: &str) -> Option<&Bout> {
        self.bouts().find(|bout| bout.id == bout_id)
    }
}

impl Document for FightCard {
    const CONTAINER: &'static str = containers::FIGHT_CARDS;

    fn id(&self) -> &str {
        &self.id
    }
}
