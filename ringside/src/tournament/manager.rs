//! Tournament manager: loads boxers, builds brackets, persists advancement.

use super::bracket::{self, validate_structure};
use super::errors::{TournamentError, TournamentResult};
use super::models::{SeedingMethod, Tournament, TournamentId};
use super::seeding::bracket_order;
use crate::auth::{Permission, Permissions};
use crate::roster::Boxer;
use crate::store::{self, DocumentStore, StoreError};
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Tournament manager
#[derive(Clone)]
pub struct TournamentManager {
    store: Arc<dyn DocumentStore>,
    /// Serializes read-modify-write cycles on brackets
    write_lock: Arc<Mutex<()>>,
}

impl TournamentManager {
    /// Create a new tournament manager
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Build and persist a bracket from the stored roster
    ///
    /// # Errors
    ///
    /// * `TournamentError::Permission` - `ManageTournaments` not granted
    /// * `TournamentError::NotEnoughParticipants` - roster smaller than 16
    pub async fn create_tournament(
        &self,
        permissions: &Permissions,
        name: String,
        method: SeedingMethod,
    ) -> TournamentResult<Tournament> {
        permissions.require(Permission::ManageTournaments)?;

        let boxers: Vec<Boxer> = store::fetch_all(self.store.as_ref()).await?;
        let order = {
            let mut rng = rand::rng();
            bracket_order(method, &boxers, &mut rng)
        };

        let tournament = bracket::create_tournament_bracket(&order, method, name)?;
        store::insert(self.store.as_ref(), &tournament).await?;

        info!("Persisted tournament {}", tournament.id);
        Ok(tournament)
    }

    /// Get tournament by ID
    pub async fn get_tournament(&self, id: &str) -> TournamentResult<Tournament> {
        store::fetch(self.store.as_ref(), id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => TournamentError::NotFound(id.to_string()),
                other => other.into(),
            })
    }

    /// List all tournaments
    pub async fn list_tournaments(&self) -> TournamentResult<Vec<Tournament>> {
        Ok(store::fetch_all(self.store.as_ref()).await?)
    }

    /// Record a match winner and persist the updated bracket
    ///
    /// Unknown match ids leave the stored tournament untouched.
    pub async fn advance_winner(
        &self,
        permissions: &Permissions,
        tournament_id: &TournamentId,
        match_id: &str,
        winner_id: &str,
    ) -> TournamentResult<Tournament> {
        permissions.require(Permission::ManageTournaments)?;

        let _guard = self.write_lock.lock().await;
        let current = self.get_tournament(tournament_id).await?;
        validate_structure(&current.matches)?;

        let updated = bracket::advance_winner(&current, match_id, winner_id)?;
        if updated != current {
            store::replace(self.store.as_ref(), &updated).await?;
            info!(
                "Tournament {}: {} won {}",
                tournament_id, winner_id, match_id
            );
        }

        Ok(updated)
    }
}
