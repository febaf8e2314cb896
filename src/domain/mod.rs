//! Domain layer: core entities and business rules.

pub mod auth_flow;
pub mod chat;
pub mod chat_list_state;
pub mod contact;
pub mod conversation;
pub mod identity;
pub mod message;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
