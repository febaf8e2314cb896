use std::path::Path;

use anyhow::{Context as _, Result};

use crate::{
    api::HttpClient,
    infra::{self, session_store::SessionStore, storage_layout::StorageLayout},
    usecases::context::AppContext,
};

/// Builds the application context and brings logging up. The explicit
/// `--config` path wins over the file in the storage layout.
pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext> {
    let layout = StorageLayout::resolve()?;

    let effective_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| layout.config_file());
    let config = infra::config::load(Some(&effective_path))?;

    infra::logging::init(&config.logging)?;

    let client = HttpClient::new(config.server.clone()).context("failed to build http client")?;
    let session_store = SessionStore::new(layout);

    Ok(AppContext::new(config, client, session_store))
}
