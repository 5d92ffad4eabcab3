use minimath_core::ProgressStore;

/// Shared application state passed to all handlers via Axum's State extractor.
pub struct AppState {
    /// SQLite-backed progress store.
    pub store: ProgressStore,
}

impl AppState {
    pub fn new(store: ProgressStore) -> Self {
        Self { store }
    }
}
