//! Document store contract and backends.
//!
//! Every entity is an independently keyed JSON document living in a named
//! container. The [`DocumentStore`] trait is the whole persistence contract:
//! whole-document get/create/update/delete/list. Two backends are provided:
//!
//! - [`InMemoryStore`]: process-local, used by tests and the `memory` server mode
//! - [`PgDocumentStore`]: a single PostgreSQL `documents` table with a JSONB body
//!
//! ## Example
//!
//! ```
//! use ringside::roster::Boxer;
//! use ringside::store::{self, InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = InMemoryStore::new();
//!     store::insert(&store, &Boxer::new("b1", "NV-1", "Ray Cruz")).await?;
//!
//!     let boxer: Boxer = store::fetch(&store, "b1").await?;
//!     assert_eq!(boxer.name, "Ray Cruz");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod memory;
pub mod postgres;
pub mod settings;

pub use config::DatabaseConfig;
pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use postgres::{Database, PgDocumentStore};
pub use settings::{AppSettings, PayoutSettings, SingletonDocument, load_settings, save_settings};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Container names shared with the rest of the association's tooling
pub mod containers {
    pub const BOXERS: &str = "boxers";
    pub const SPONSORS: &str = "sponsors";
    pub const FIGHT_CARDS: &str = "fightCards";
    pub const BETTING_POOLS: &str = "bettingPools";
    pub const BETS: &str = "bets";
    pub const TOURNAMENTS: &str = "tournaments";
    pub const APP_SETTINGS: &str = "app_settings";
    pub const PAYOUT_SETTINGS: &str = "payout_settings";
}

/// Whole-document storage keyed by container and id
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` when absent
    async fn get(&self, container: &str, id: &str) -> StoreResult<Option<Value>>;

    /// Insert a new document; its `id` field is the key
    async fn create(&self, container: &str, document: Value) -> StoreResult<Value>;

    /// Replace an existing document
    async fn update(&self, container: &str, id: &str, document: Value) -> StoreResult<Value>;

    /// Insert or replace
    async fn upsert(&self, container: &str, id: &str, document: Value) -> StoreResult<Value>;

    /// Remove a document
    async fn delete(&self, container: &str, id: &str) -> StoreResult<()>;

    /// Every document in a container
    async fn list(&self, container: &str) -> StoreResult<Vec<Value>>;
}

/// A model persisted as one document in a fixed container
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const CONTAINER: &'static str;

    fn id(&self) -> &str;
}

/// Read the `id` field of a raw document
pub(crate) fn document_id(container: &str, document: &Value) -> StoreResult<String> {
    document
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StoreError::MissingId(container.to_string()))
}

/// Fetch and decode one document
///
/// # Errors
///
/// * `StoreError::NotFound` - no document with this id
pub async fn fetch<T: Document>(store: &dyn DocumentStore, id: &str) -> StoreResult<T> {
    let value = store
        .get(T::CONTAINER, id)
        .await?
        .ok_or_else(|| StoreError::not_found(T::CONTAINER, id))?;
    Ok(serde_json::from_value(value)?)
}

/// Fetch and decode every document of a container
pub async fn fetch_all<T: Document>(store: &dyn DocumentStore) -> StoreResult<Vec<T>> {
    store
        .list(T::CONTAINER)
        .await?
        .into_iter()
        .map(|value| serde_json::from_value(value).map_err(StoreError::from))
        .collect()
}

/// Persist a new document
pub async fn insert<T: Document>(store: &dyn DocumentStore, document: &T) -> StoreResult<()> {
    store
        .create(T::CONTAINER, serde_json::to_value(document)?)
        .await?;
    Ok(())
}

/// Replace an existing document
pub async fn replace<T: Document>(store: &dyn DocumentStore, document: &T) -> StoreResult<()> {
    store
        .update(T::CONTAINER, document.id(), serde_json::to_value(document)?)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_id_extraction() {
        assert_eq!(
            document_id("bets", &json!({"id": "bet-1"})).unwrap(),
            "bet-1"
        );
        assert!(matches!(
            document_id("bets", &json!({"amount": 5})),
            Err(StoreError::MissingId(_))
        ));
        assert!(matches!(
            document_id("bets", &json!({"id": 5})),
            Err(StoreError::MissingId(_))
        ));
    }
}
