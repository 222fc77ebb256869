//! Fight card manager: result declaration against the document store.

use super::errors::{ResultsError, ResultsResult};
use super::models::FightCard;
use super::results::{self, BoutDecision, ResultDeclaration};
use crate::auth::Permissions;
use crate::roster::Boxer;
use crate::store::{self, DocumentStore, StoreError};
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Fight card manager
#[derive(Clone)]
pub struct FightCardManager {
    store: Arc<dyn DocumentStore>,
    /// Two declarations against one card must not interleave
    write_lock: Arc<Mutex<()>>,
}

impl FightCardManager {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Get fight card by ID
    pub async fn get_card(&self, card_id: &str) -> ResultsResult<FightCard> {
        store::fetch(self.store.as_ref(), card_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => ResultsError::CardNotFound(card_id.to_string()),
                other => other.into(),
            })
    }

    /// Declare results and persist the completed card and changed boxers
    ///
    /// # Errors
    ///
    /// * `ResultsError::CardNotFound` - no such card
    /// * `ResultsError::AlreadyCompleted` - results were already declared
    /// * `ResultsError::Permission` - `DeclareResults` not granted
    pub async fn declare_results(
        &self,
        permissions: &Permissions,
        card_id: &str,
        decisions: &[BoutDecision],
    ) -> ResultsResult<ResultDeclaration> {
        let _guard = self.write_lock.lock().await;

        let card = self.get_card(card_id).await?;
        let boxers: Vec<Boxer> = store::fetch_all(self.store.as_ref()).await?;

        let outcome = results::declare_results(permissions, &card, &boxers, decisions)?;

        for boxer in outcome.touched_boxers() {
            store::replace(self.store.as_ref(), boxer).await?;
        }
        store::replace(self.store.as_ref(), &outcome.card).await?;

        info!(
            "Persisted results for card {} ({} boxers updated)",
            card_id,
            outcome.touched.len()
        );
        Ok(outcome)
    }
}
