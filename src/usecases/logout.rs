use crate::infra::{error::AppError, session_store::SessionStore, storage_layout::StorageLayout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub token_removed: bool,
}

/// Removes the persisted token. Purely local: the server holds no client
/// session state worth revoking beyond the token itself going unused.
pub fn logout_and_reset() -> Result<LogoutOutcome, AppError> {
    let layout = StorageLayout::resolve()?;
    let store = SessionStore::new(layout);
    let token_removed = store.clear()?;

    tracing::info!(token_removed, "logout completed");
    Ok(LogoutOutcome { token_removed })
}
