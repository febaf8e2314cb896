//! Use case layer: application workflows and orchestration.

pub mod bootstrap;
pub mod clock;
pub mod context;
pub mod logout;
pub mod profile;
pub mod shell;
pub mod sign_in;
pub mod startup;
pub mod sync_engine;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
