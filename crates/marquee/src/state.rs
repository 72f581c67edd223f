//! Shared application state.

use marquee_metadata::MovieProvider;
use marquee_store::SharedStore;
use std::sync::Arc;

/// Dependencies shared by every handler: the lazily-initialized store
/// handle and the movie metadata provider.
#[derive(Clone)]
pub struct AppState {
    /// The persistence handle. Initialized on first use, shared for the
    /// process lifetime.
    pub store: SharedStore,
    /// The movie metadata capability.
    pub movies: Arc<dyn MovieProvider>,
}

impl AppState {
    /// Creates the application state.
    #[must_use]
    pub fn new(store: SharedStore, movies: Arc<dyn MovieProvider>) -> Self {
        Self { store, movies }
    }
}
