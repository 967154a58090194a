//! Shared application state for all routes.

use crate::store::EtudiantStore;
use std::sync::Arc;

/// The storage handle is injected here once at startup and cloned into
/// every handler; there is no module-level connection.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EtudiantStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn EtudiantStore>) -> Self {
        AppState { store }
    }
}
