//! Infrastructure layer: configuration, logging, storage and process-level
//! concerns.

pub mod config;
pub mod error;
pub mod logging;
pub mod secrets;
pub mod session_store;
pub mod storage_layout;

/// Returns the infra module name for smoke checks.
pub fn module_name() -> &'static str {
    "infra"
}
