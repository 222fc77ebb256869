//! Boxer data models.

use crate::store::{Document, containers};
use serde::{Deserialize, Serialize};

/// Boxer ID type
pub type BoxerId = String;

/// License standing with the association
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    Active,
    Suspended,
    Expired,
    #[default]
    Pending,
}

/// Registered boxer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boxer {
    pub id: BoxerId,
    /// State-issued identification number
    pub state_id: String,
    pub name: String,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub knockouts: u32,
    /// Accumulated by the association's ranking process
    #[serde(default)]
    pub ranking_points: i64,
    #[serde(default)]
    pub license_status: LicenseStatus,
}

impl Boxer {
    /// Create a boxer with an empty record
    pub fn new(id: impl Into<BoxerId>, state_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state_id: state_id.into(),
            name: name.into(),
            wins: 0,
            losses: 0,
            knockouts: 0,
            ranking_points: 0,
            license_status: LicenseStatus::Active,
        }
    }

    /// Set ranking points
    pub fn with_ranking_points(mut self, points: i64) -> Self {
        self.ranking_points = points;
        self
    }

    /// Set win/loss record
    pub fn with_record(mut self, wins: u32, losses: u32, knockouts: u32) -> Self {
        self.wins = wins;
        self.losses = losses;
        self.knockouts = knockouts;
        self
    }

    /// Copy of this boxer with `delta` added to the record
    pub fn with_delta(&self, delta: &RecordDelta) -> Self {
        Self {
            wins: self.wins + delta.wins,
            losses: self.losses + delta.losses,
            knockouts: self.knockouts + delta.knockouts,
            ..self.clone()
        }
    }
}

impl Document for Boxer {
    const CONTAINER: &'static str = containers::BOXERS;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Pending change to a boxer's record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordDelta {
    pub wins: u32,
    pub losses: u32,
    pub knockouts: u32,
}

impl RecordDelta {
    pub fn is_empty(&self) -> bool {
        self.wins == 0 && self.losses == 0 && self.knockouts == 0
    }
}
