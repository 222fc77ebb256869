//! Singleton settings documents.
//!
//! Each settings container holds exactly one document with the fixed id
//! `main`. Reads fall back to the type's default when the document is absent;
//! writes upsert it with a refreshed `updatedAt`.

use super::{DocumentStore, StoreResult, containers};
use crate::betting::OddsFormat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Fixed id of every singleton settings document
pub const SINGLETON_ID: &str = "main";

/// A settings object stored as the single document of its container
pub trait SingletonDocument: Serialize + DeserializeOwned + Default + Send + Sync {
    const CONTAINER: &'static str;

    /// Refresh the modification timestamp
    fn touch(&mut self, now: DateTime<Utc>);
}

/// Association-wide application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub id: String,
    pub association_name: String,
    /// Convention used when odds are displayed without an explicit format
    pub default_odds_format: OddsFormat,
    pub betting_enabled: bool,
    /// Smallest accepted stake, minor units
    pub min_bet: i64,
    /// Largest accepted stake, minor units
    pub max_bet: i64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            id: SINGLETON_ID.to_string(),
            association_name: "Boxing Association".to_string(),
            default_odds_format: OddsFormat::American,
            betting_enabled: true,
            min_bet: 100,
            max_bet: 100_000,
            updated_at: None,
        }
    }
}

impl SingletonDocument for AppSettings {
    const CONTAINER: &'static str = containers::APP_SETTINGS;

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }
}

/// Adjustments applied to winning payouts at settlement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutSettings {
    pub id: String,
    /// Fraction of winning profit withheld, 0.0..=1.0
    pub tax_rate: f64,
    /// Fraction of winning profit added on top, >= 0.0
    pub bonus_rate: f64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for PayoutSettings {
    fn default() -> Self {
        Self {
            id: SINGLETON_ID.to_string(),
            tax_rate: 0.0,
            bonus_rate: 0.0,
            updated_at: None,
        }
    }
}

impl SingletonDocument for PayoutSettings {
    const CONTAINER: &'static str = containers::PAYOUT_SETTINGS;

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }
}

/// Load a settings singleton, falling back to its default when absent
pub async fn load_settings<T: SingletonDocument>(store: &dyn DocumentStore) -> StoreResult<T> {
    match store.get(T::CONTAINER, SINGLETON_ID).await? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(T::default()),
    }
}

/// Upsert a settings singleton with a refreshed `updatedAt`
pub async fn save_settings<T: SingletonDocument>(
    store: &dyn DocumentStore,
    mut settings: T,
) -> StoreResult<T> {
    settings.touch(Utc::now());
    let mut value = serde_json::to_value(&settings)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("id".to_string(), SINGLETON_ID.into());
    }
    let stored = store.upsert(T::CONTAINER, SINGLETON_ID, value).await?;
    Ok(serde_json::from_value(stored)?)
}
