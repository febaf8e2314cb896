//! Blocking HTTP client over the backend functions. The async transport is
//! driven by a private current-thread runtime so the rest of the app stays
//! synchronous.

use std::cell::RefCell;

use base64::Engine as _;
use serde::de::DeserializeOwned;
use tokio::runtime::Builder;

use crate::{
    api::{
        error::ApiError,
        wire::{
            ChatListResponse, ContactListResponse, ErrorBody, MessageListResponse,
            OpenChatRequest, OpenChatResponse, SendCodeRequest, SendCodeResponse,
            SendMessageRequest, SendMessageResponse, SessionResponse, UpdateProfileRequest,
            UploadAvatarRequest, VerifyRequest, VerifyResponse,
        },
    },
    domain::{
        auth_flow::CodePurpose,
        chat::ChatSummary,
        contact::Contact,
        identity::{Identity, Session, SessionToken},
        message::Message,
    },
    infra::config::ServerConfig,
    usecases::{
        profile::ProfileApi,
        sign_in::AuthGateway,
        startup::SessionProbe,
        sync_engine::SyncApi,
    },
};

const SESSION_HEADER: &str = "X-Session-Id";

pub struct HttpClient {
    rt: tokio::runtime::Runtime,
    http: reqwest::Client,
    server: ServerConfig,
    token: RefCell<Option<SessionToken>>,
}

impl HttpClient {
    pub fn new(server: ServerConfig) -> Result<Self, ApiError> {
        let rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| {
                ApiError::Transport(format!("failed to initialize async runtime: {error}"))
            })?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(server.request_timeout_ms))
            .build()
            .map_err(|error| {
                ApiError::Transport(format!("failed to build http client: {error}"))
            })?;

        Ok(Self {
            rt,
            http,
            server,
            token: RefCell::new(None),
        })
    }

    pub fn set_token(&self, token: SessionToken) {
        *self.token.borrow_mut() = Some(token);
    }

    pub fn clear_token(&self) {
        *self.token.borrow_mut() = None;
    }

    fn contacts_url(&self) -> String {
        format!("{}/contacts", self.server.chats_url.trim_end_matches('/'))
    }

    /// Sends one request and decodes the JSON body, applying the uniform
    /// status mapping. The session header rides along when a token is held.
    fn execute<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let request = match self.token.borrow().as_ref() {
            Some(token) => request.header(SESSION_HEADER, token.as_str()),
            None => request,
        };

        self.rt.block_on(async {
            let response = request
                .send()
                .await
                .map_err(|error| ApiError::Transport(error.to_string()))?;

            let status = response.status().as_u16();
            if (200..300).contains(&status) {
                return response
                    .json::<T>()
                    .await
                    .map_err(|error| ApiError::Transport(error.to_string()));
            }

            let body = response.json::<ErrorBody>().await.unwrap_or_default();
            Err(map_failure(status, body))
        })
    }
}

/// Uniform non-2xx mapping: 401 always means the session is gone, 429 is a
/// server-signaled cooldown, the rest keep the server's message.
pub fn map_failure(status: u16, body: ErrorBody) -> ApiError {
    match status {
        401 => ApiError::Unauthenticated,
        429 => ApiError::RateLimited {
            retry_after_secs: body.retry_after.unwrap_or(60),
        },
        _ => ApiError::RequestFailed {
            status,
            message: body.display_message(status),
        },
    }
}

impl AuthGateway for HttpClient {
    fn send_code(&self, phone: &str) -> Result<CodePurpose, ApiError> {
        let response: SendCodeResponse = self.execute(self.http.post(&self.server.auth_url).json(
            &SendCodeRequest {
                action: "send",
                phone,
            },
        ))?;

        tracing::debug!(?response.purpose, "verification code requested");
        Ok(response.purpose.into())
    }

    fn verify_code(
        &self,
        phone: &str,
        code: &str,
        display_name: Option<&str>,
    ) -> Result<Session, ApiError> {
        let response: VerifyResponse = self.execute(self.http.post(&self.server.auth_url).json(
            &VerifyRequest {
                action: "verify",
                phone,
                code,
                display_name,
            },
        ))?;

        let token = SessionToken::new(response.token);
        self.set_token(token.clone());
        Ok(Session::new(token, response.user.into()))
    }
}

impl SessionProbe for HttpClient {
    fn check_session(&self, token: &SessionToken) -> Result<Option<Session>, ApiError> {
        self.set_token(token.clone());

        let result: Result<SessionResponse, ApiError> =
            self.execute(self.http.get(&self.server.session_url));

        match result {
            Ok(response) => Ok(Some(Session::new(token.clone(), response.user.into()))),
            Err(ApiError::Unauthenticated) => {
                self.clear_token();
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

impl SyncApi for HttpClient {
    fn list_chats(&self) -> Result<Vec<ChatSummary>, ApiError> {
        let response: ChatListResponse = self.execute(self.http.get(&self.server.chats_url))?;
        Ok(response.chats.into_iter().map(Into::into).collect())
    }

    fn list_contacts(&self) -> Result<Vec<Contact>, ApiError> {
        let response: ContactListResponse = self.execute(self.http.get(self.contacts_url()))?;
        Ok(response.contacts.into_iter().map(Into::into).collect())
    }

    fn list_messages(&self, chat_id: i64) -> Result<Vec<Message>, ApiError> {
        let response: MessageListResponse = self.execute(
            self.http
                .get(&self.server.messages_url)
                .query(&[("chat_id", chat_id)]),
        )?;
        Ok(response.messages.into_iter().map(Into::into).collect())
    }

    fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, ApiError> {
        let response: SendMessageResponse = self.execute(
            self.http
                .post(&self.server.messages_url)
                .json(&SendMessageRequest { chat_id, text }),
        )?;
        Ok(response.message.into())
    }

    fn open_chat(&self, contact_id: i64) -> Result<i64, ApiError> {
        let response: OpenChatResponse = self.execute(
            self.http
                .post(&self.server.chats_url)
                .json(&OpenChatRequest {
                    user_id: contact_id,
                }),
        )?;
        Ok(response.chat_id)
    }
}

impl ProfileApi for HttpClient {
    fn update_profile(
        &self,
        display_name: &str,
        position: &str,
        department: &str,
    ) -> Result<Identity, ApiError> {
        let response: SessionResponse = self.execute(
            self.http
                .patch(&self.server.profile_url)
                .json(&UpdateProfileRequest {
                    display_name,
                    position,
                    department,
                }),
        )?;
        Ok(response.user.into())
    }

    fn upload_avatar(&self, image: &[u8], content_type: &str) -> Result<Identity, ApiError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let response: SessionResponse = self.execute(
            self.http
                .post(&self.server.profile_url)
                .json(&UploadAvatarRequest {
                    image: encoded,
                    content_type,
                }),
        )?;
        Ok(response.user.into())
    }
}
