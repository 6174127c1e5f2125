use std::sync::Arc;

use tokio::sync::RwLock;

use crate::services::{providers::MovieProvider, Recommender};
use crate::store::{KeyValueStore, UserState};

/// Shared application state
///
/// Owns the user's ratings and histories; handlers mutate them through the
/// lock and write the touched record back to the store. The write lock is
/// held until the save completes so saves of one record land in order.
#[derive(Clone)]
pub struct AppState {
    pub user: Arc<RwLock<UserState>>,
    pub provider: Arc<dyn MovieProvider>,
    pub store: Arc<dyn KeyValueStore>,
    pub recommender: Recommender,
}

impl AppState {
    /// Creates state from already-loaded user data
    pub fn new(
        provider: Arc<dyn MovieProvider>,
        store: Arc<dyn KeyValueStore>,
        user: UserState,
    ) -> Self {
        Self {
            user: Arc::new(RwLock::new(user)),
            recommender: Recommender::new(Arc::clone(&provider)),
            provider,
            store,
        }
    }

    /// Reads persisted user data once, then builds the state
    pub async fn load(provider: Arc<dyn MovieProvider>, store: Arc<dyn KeyValueStore>) -> Self {
        let user = UserState::load(store.as_ref()).await;

        tracing::info!(
            ratings = user.ratings.len(),
            searches = user.search_history.len(),
            watched = user.watch_history.len(),
            "Loaded user state"
        );

        Self::new(provider, store, user)
    }
}
