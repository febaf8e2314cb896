use serde::Deserialize;

use crate::infra::config::{AppConfig, LogConfig, ServerConfig, SyncConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub server: Option<FileServerConfig>,
    pub sync: Option<FileSyncConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(server) = self.server {
            server.merge_into(&mut config.server);
        }

        if let Some(sync) = self.sync {
            sync.merge_into(&mut config.sync);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileServerConfig {
    pub auth_url: Option<String>,
    pub session_url: Option<String>,
    pub chats_url: Option<String>,
    pub messages_url: Option<String>,
    pub profile_url: Option<String>,
    pub request_timeout_ms: Option<u64>,
}

impl FileServerConfig {
    fn merge_into(self, config: &mut ServerConfig) {
        if let Some(auth_url) = self.auth_url {
            config.auth_url = auth_url;
        }

        if let Some(session_url) = self.session_url {
            config.session_url = session_url;
        }

        if let Some(chats_url) = self.chats_url {
            config.chats_url = chats_url;
        }

        if let Some(messages_url) = self.messages_url {
            config.messages_url = messages_url;
        }

        if let Some(profile_url) = self.profile_url {
            config.profile_url = profile_url;
        }

        if let Some(timeout_ms) = self.request_timeout_ms {
            config.request_timeout_ms = timeout_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileSyncConfig {
    pub poll_interval_ticks: Option<u32>,
    pub resend_cooldown_ticks: Option<u32>,
}

impl FileSyncConfig {
    fn merge_into(self, config: &mut SyncConfig) {
        if let Some(poll) = self.poll_interval_ticks {
            config.poll_interval_ticks = poll;
        }

        if let Some(cooldown) = self.resend_cooldown_ticks {
            config.resend_cooldown_ticks = cooldown;
        }
    }
}
