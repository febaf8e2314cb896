//! Server integration layer: typed HTTP client and wire mapping.

mod client;
mod error;
mod wire;

pub use client::HttpClient;
pub use error::ApiError;

/// Returns the api module name for smoke checks.
pub fn module_name() -> &'static str {
    "api"
}
