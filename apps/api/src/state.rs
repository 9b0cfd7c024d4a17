use std::sync::Arc;

use crate::extraction::dispatcher::Dispatcher;
use crate::keys::store::CredentialStore;
use crate::results::repository::PostRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub keys: Arc<dyn CredentialStore>,
    pub posts: Arc<dyn PostRepository>,
    /// Holds its own handle on `keys` for credential resolution.
    pub dispatcher: Arc<Dispatcher>,
}
