use crate::{api::HttpClient, infra::config::AppConfig, infra::session_store::SessionStore};

/// Shared application wiring built once at startup.
pub struct AppContext {
    pub config: AppConfig,
    pub client: HttpClient,
    pub session_store: SessionStore,
}

impl AppContext {
    pub fn new(config: AppConfig, client: HttpClient, session_store: SessionStore) -> Self {
        Self {
            config,
            client,
            session_store,
        }
    }
}
