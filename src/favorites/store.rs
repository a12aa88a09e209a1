use std::{collections::HashSet, future::Future, sync::Arc, time::Duration};

use serde::Serialize;
use tokio::{
    sync::{RwLock, broadcast, watch},
    task::JoinHandle,
};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{EdgeError, FavoriteEdges, RecipeId};

const NOTICE_CAPACITY: usize = 32;

/// User-visible messages produced by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    SignInRequired,
    Added,
    Removed,
    AlreadyFavorite,
    Failed,
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::SignInRequired => "Sign in required",
            Notice::Added => "Added to favorites",
            Notice::Removed => "Removed from favorites",
            Notice::AlreadyFavorite => "Already in favorites",
            Notice::Failed => "Error",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Notice::SignInRequired => "Please sign in to save your favorite recipes.",
            Notice::Added => "Recipe saved to your favorites!",
            Notice::Removed => "Recipe removed from your favorites.",
            Notice::AlreadyFavorite => "This recipe is already in your favorites.",
            Notice::Failed => "Something went wrong. Please try again.",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::SignInRequired | Notice::Failed)
    }
}

/// Result of a single toggle: whether the caller should treat the action as
/// accepted, and the notice that was published for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub accepted: bool,
    pub notice: Notice,
}

#[derive(Debug, Default)]
struct StoreState {
    principal: Option<Uuid>,
    favorites: HashSet<RecipeId>,
    pending_loads: usize,
}

/// In-memory favorite set for one principal.
///
/// The remote table is the source of truth. Mutations are remote-first: the
/// local set only changes after the remote call succeeds, so a failed call
/// never needs a rollback. The state lock is never held across a remote call.
pub struct FavoritesStore {
    edges: Arc<dyn FavoriteEdges>,
    state: RwLock<StoreState>,
    notices: broadcast::Sender<Notice>,
    timeout: Duration,
}

impl FavoritesStore {
    pub fn new(edges: Arc<dyn FavoriteEdges>, principal: Option<Uuid>, timeout: Duration) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            edges,
            state: RwLock::new(StoreState {
                principal,
                ..StoreState::default()
            }),
            notices,
            timeout,
        }
    }

    /// Build a store and run the initial load.
    pub async fn load(
        edges: Arc<dyn FavoriteEdges>,
        principal: Option<Uuid>,
        timeout: Duration,
    ) -> Self {
        let store = Self::new(edges, principal, timeout);
        store.refresh().await;
        store
    }

    /// Like [`FavoritesStore::load`], but a failed initial load is returned
    /// instead of leaving an empty set behind.
    pub async fn try_load(
        edges: Arc<dyn FavoriteEdges>,
        principal: Option<Uuid>,
        timeout: Duration,
    ) -> Result<Self, EdgeError> {
        let store = Self::new(edges, principal, timeout);
        store.try_refresh().await?;
        Ok(store)
    }

    pub async fn principal(&self) -> Option<Uuid> {
        self.state.read().await.principal
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Replace the local set with the principal's remote edges.
    ///
    /// Errors are logged and leave the set untouched. A result that arrives
    /// after the principal changed is dropped.
    pub async fn refresh(&self) {
        if let Err(err) = self.try_refresh().await {
            tracing::error!(error = %err, "error fetching favorites");
        }
    }

    /// [`FavoritesStore::refresh`] that reports the remote failure.
    pub async fn try_refresh(&self) -> Result<(), EdgeError> {
        let user_id = {
            let mut state = self.state.write().await;
            let principal = state.principal;
            match principal {
                Some(user_id) => {
                    state.pending_loads += 1;
                    user_id
                }
                None => {
                    state.favorites.clear();
                    return Ok(());
                }
            }
        };

        let result = self.remote(self.edges.select_by_user(user_id)).await;

        let mut state = self.state.write().await;
        state.pending_loads -= 1;
        let ids = result?;
        if state.principal == Some(user_id) {
            state.favorites = ids.into_iter().collect();
            tracing::debug!(%user_id, count = state.favorites.len(), "favorites loaded");
        } else {
            tracing::debug!(%user_id, "discarding favorites of a previous principal");
        }
        Ok(())
    }

    pub async fn refetch(&self) {
        self.refresh().await;
    }

    pub async fn is_favorite(&self, recipe_id: &str) -> bool {
        self.state.read().await.favorites.contains(recipe_id)
    }

    /// Sorted snapshot of the favorite set.
    pub async fn favorites(&self) -> Vec<RecipeId> {
        let mut ids: Vec<RecipeId> = self.state.read().await.favorites.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// True while a `refresh` is in flight. Toggles never set it.
    pub async fn loading(&self) -> bool {
        self.state.read().await.pending_loads > 0
    }

    pub async fn toggle_favorite(&self, recipe_id: &str) -> bool {
        self.toggle(recipe_id).await.accepted
    }

    pub async fn toggle(&self, recipe_id: &str) -> ToggleOutcome {
        let (principal, is_member) = {
            let state = self.state.read().await;
            (state.principal, state.favorites.contains(recipe_id))
        };

        let Some(user_id) = principal else {
            return self.publish(false, Notice::SignInRequired);
        };

        if is_member {
            match self.remote(self.edges.delete(user_id, recipe_id)).await {
                Ok(()) => {
                    self.apply(user_id, |set| {
                        set.remove(recipe_id);
                    })
                    .await;
                    self.publish(true, Notice::Removed)
                }
                Err(err) => self.fail(user_id, recipe_id, err),
            }
        } else {
            match self.remote(self.edges.insert(user_id, recipe_id)).await {
                Ok(_) => {
                    self.apply(user_id, |set| {
                        set.insert(recipe_id.to_string());
                    })
                    .await;
                    self.publish(true, Notice::Added)
                }
                Err(EdgeError::UniqueViolation) => {
                    tracing::info!(%user_id, recipe_id, "favorite already exists, reconciling");
                    self.refresh().await;
                    self.publish(true, Notice::AlreadyFavorite)
                }
                Err(err) => self.fail(user_id, recipe_id, err),
            }
        }
    }

    /// Switch to a new principal. Returns false when the identity is unchanged.
    ///
    /// The old principal's set is dropped before the reload, so a sign-out
    /// leaves the store empty.
    pub async fn set_principal(&self, principal: Option<Uuid>) -> bool {
        {
            let mut state = self.state.write().await;
            if state.principal == principal {
                return false;
            }
            state.principal = principal;
            state.favorites.clear();
        }
        tracing::debug!(principal = ?principal, "principal changed");
        self.refresh().await;
        true
    }

    /// Follow sign-in / sign-out notifications until the sender is dropped.
    pub fn follow_principal(
        self: &Arc<Self>,
        mut principal: watch::Receiver<Option<Uuid>>,
    ) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let initial = *principal.borrow_and_update();
            if !store.set_principal(initial).await {
                store.refresh().await;
            }
            while principal.changed().await.is_ok() {
                let next = *principal.borrow_and_update();
                store.set_principal(next).await;
            }
        })
    }

    async fn remote<T>(
        &self,
        call: impl Future<Output = Result<T, EdgeError>>,
    ) -> Result<T, EdgeError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or(Err(EdgeError::Timeout(self.timeout)))
    }

    async fn apply(&self, user_id: Uuid, mutate: impl FnOnce(&mut HashSet<RecipeId>)) {
        let mut state = self.state.write().await;
        if state.principal == Some(user_id) {
            mutate(&mut state.favorites);
        }
    }

    fn fail(&self, user_id: Uuid, recipe_id: &str, err: EdgeError) -> ToggleOutcome {
        tracing::error!(%user_id, recipe_id, error = %err, "error toggling favorite");
        self.publish(false, Notice::Failed)
    }

    fn publish(&self, accepted: bool, notice: Notice) -> ToggleOutcome {
        // No subscribers is fine.
        let _ = self.notices.send(notice);
        ToggleOutcome { accepted, notice }
    }
}
