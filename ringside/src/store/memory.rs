//! Process-local document store.

use super::{DocumentStore, StoreError, StoreResult, document_id};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// In-memory [`DocumentStore`]; containers are created on first write
#[derive(Debug, Default)]
pub struct InMemoryStore {
    containers: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a container
    pub async fn count(&self, container: &str) -> usize {
        self.containers
            .read()
            .await
            .get(container)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, container: &str, id: &str) -> StoreResult<Option<Value>> {
        Ok(self
            .containers
            .read()
            .await
            .get(container)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn create(&self, container: &str, document: Value) -> StoreResult<Value> {
        let id = document_id(container, &document)?;
        let mut containers = self.containers.write().await;
        let docs = containers.entry(container.to_string()).or_default();

        if docs.contains_key(&id) {
            return Err(StoreError::AlreadyExists {
                container: container.to_string(),
                id,
            });
        }

        docs.insert(id, document.clone());
        Ok(document)
    }

    async fn update(&self, container: &str, id: &str, document: Value) -> StoreResult<Value> {
        let mut containers = self.containers.write().await;
        let slot = containers
            .get_mut(container)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(container, id))?;

        *slot = document.clone();
        Ok(document)
    }

    async fn upsert(&self, container: &str, id: &str, document: Value) -> StoreResult<Value> {
        self.containers
            .write()
            .await
            .entry(container.to_string())
            .or_default()
            .insert(id.to_string(), document.clone());
        Ok(document)
    }

    async fn delete(&self, container: &str, id: &str) -> StoreResult<()> {
        self.containers
            .write()
            .await
            .get_mut(container)
            .and_then(|docs| docs.remove(id))
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(container, id))
    }

    async fn list(&self, container: &str) -> StoreResult<Vec<Value>> {
        Ok(self
            .containers
            .read()
            .await
            .get(container)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_then_get() {
        let store = InMemoryStore::new();
        store
            .create("boxers", json!({"id": "b1", "name": "Ray"}))
            .await
            .unwrap();

        let doc = store.get("boxers", "b1").await.unwrap().unwrap();
        assert_eq!(doc["name"], "Ray");
        assert!(store.get("boxers", "b2").await.unwrap().is_none());
        assert!(store.get("bets", "b1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_rejected() {
        let store = InMemoryStore::new();
        store.create("bets", json!({"id": "x"})).await.unwrap();
        let err = store.create("bets", json!({"id": "x"})).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryStore::new();
        let err = store
            .update("bets", "nope", json!({"id": "nope"}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_upsert_and_delete() {
        let store = InMemoryStore::new();
        store
            .upsert("app_settings", "main", json!({"id": "main", "v": 1}))
            .await
            .unwrap();
        store
            .upsert("app_settings", "main", json!({"id": "main", "v": 2}))
            .await
            .unwrap();
        assert_eq!(store.count("app_settings").await, 1);
        assert_eq!(store.get("app_settings", "main").await.unwrap().unwrap()["v"], 2);

        store.delete("app_settings", "main").await.unwrap();
        assert_eq!(store.count("app_settings").await, 0);
        assert!(store.delete("app_settings", "main").await.is_err());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let store = InMemoryStore::new();
        for id in ["c", "a", "b"] {
            store.create("boxers", json!({"id": id})).await.unwrap();
        }
        let ids: Vec<String> = store
            .list("boxers")
            .await
            .unwrap()
            .iter()
            .map(|doc| doc["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(store.list("sponsors").await.unwrap().is_empty());
    }
}
