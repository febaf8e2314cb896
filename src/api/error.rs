use thiserror::Error;

/// Uniform failure surface of the request layer. One attempt per call;
/// callers decide what, if anything, to retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No token held, or the server rejected the one we sent.
    #[error("session is missing or no longer valid")]
    Unauthenticated,
    /// Server-signaled cooldown (HTTP 429).
    #[error("too many requests, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },
    /// Any other non-2xx answer, with the server's message payload.
    #[error("server rejected the request ({status}): {message}")]
    RequestFailed { status: u16, message: String },
    /// Connectivity or decode failure; worded generically for the user.
    #[error("network error: {0}")]
    Transport(String),
}

impl ApiError {
    /// Displayable wording; transport details are kept generic.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthenticated => {
                "Your session has expired. Please sign in again.".to_owned()
            }
            ApiError::RateLimited { retry_after_secs } => {
                format!("Too many attempts. Wait about {retry_after_secs}s and retry.")
            }
            ApiError::RequestFailed { message, .. } => message.clone(),
            ApiError::Transport(_) => {
                "Connection problem. Check your network and retry.".to_owned()
            }
        }
    }
}
