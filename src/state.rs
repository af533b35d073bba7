use std::sync::Arc;

use crate::auth::{IdentityProvider, SessionKeys};
use crate::database::CatalogRepository;

/// Shared handles every request handler can reach
#[derive(Clone)]
pub struct AppState {
    pub repo: CatalogRepository,
    pub session_keys: Arc<SessionKeys>,
    pub identity: Arc<dyn IdentityProvider>,
    pub application_name: Arc<str>,
}

impl AppState {
    pub fn new(
        repo: CatalogRepository,
        session_keys: SessionKeys,
        identity: Arc<dyn IdentityProvider>,
        application_name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            repo,
            session_keys: Arc::new(session_keys),
            identity,
            application_name: application_name.into(),
        }
    }
}
