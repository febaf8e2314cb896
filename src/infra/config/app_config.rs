use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub server: ServerConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

/// Backend endpoints. Each function is deployed at its own URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub auth_url: String,
    pub session_url: String,
    pub chats_url: String,
    pub messages_url: String,
    pub profile_url: String,
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            auth_url: "https://functions.example.net/drg-auth".to_owned(),
            session_url: "https://functions.example.net/drg-session".to_owned(),
            chats_url: "https://functions.example.net/drg-chats".to_owned(),
            messages_url: "https://functions.example.net/drg-messages".to_owned(),
            profile_url: "https://functions.example.net/drg-profile".to_owned(),
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncConfig {
    pub poll_interval_ticks: u32,
    pub resend_cooldown_ticks: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ticks: 5,
            resend_cooldown_ticks: 60,
        }
    }
}
