use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::domain::repositories::DocumentStore;

/// Shared application state
///
/// Both clients are built once at startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { store, verifier }
    }
}
