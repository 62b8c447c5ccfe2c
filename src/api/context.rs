use crate::store::PlantStore;
use std::sync::Arc;

/// Shared handler state: the one store handle built at startup.
pub struct AppState<S> {
    pub store: Arc<S>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S> AppState<S>
where
    S: PlantStore,
{
    pub fn new(store: S) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }

    pub fn from_arc(store: Arc<S>) -> Self {
        AppState { store }
    }
}
