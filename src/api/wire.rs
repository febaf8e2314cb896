//! JSON wire format of the backend functions, mapped to domain types.

use serde::{Deserialize, Serialize};

use crate::domain::{
    auth_flow::CodePurpose,
    chat::{ChatKind, ChatSummary},
    contact::Contact,
    identity::Identity,
    message::{Message, MessageKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurposeDto {
    Login,
    Register,
}

impl From<PurposeDto> for CodePurpose {
    fn from(value: PurposeDto) -> Self {
        match value {
            PurposeDto::Login => CodePurpose::Login,
            PurposeDto::Register => CodePurpose::Register,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendCodeResponse {
    pub purpose: PurposeDto,
}

#[derive(Debug, Deserialize)]
pub struct VerifyResponse {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    pub user: UserDto,
}

#[derive(Debug, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub avatar_initials: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub online: bool,
}

impl From<UserDto> for Identity {
    fn from(dto: UserDto) -> Self {
        let avatar_initials = dto
            .avatar_initials
            .unwrap_or_else(|| crate::domain::identity::make_initials(&dto.display_name));
        Identity {
            id: dto.id,
            username: dto.username,
            display_name: dto.display_name,
            phone: dto.phone.unwrap_or_default(),
            position: dto.position,
            department: dto.department,
            avatar_initials,
            avatar_url: dto.avatar_url,
            online: dto.online,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatListResponse {
    pub chats: Vec<ChatDto>,
}

#[derive(Debug, Deserialize)]
pub struct ChatDto {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub last_message: String,
    #[serde(default)]
    pub last_time: String,
    #[serde(default)]
    pub unread: u32,
}

impl From<ChatDto> for ChatSummary {
    fn from(dto: ChatDto) -> Self {
        let kind = match dto.kind.as_str() {
            "group" => ChatKind::Group,
            "bot" => ChatKind::Bot,
            _ => ChatKind::Personal,
        };
        ChatSummary {
            chat_id: dto.id,
            kind,
            name: dto.name,
            avatar_initials: dto.avatar.unwrap_or_else(|| "??".to_owned()),
            online: (kind == ChatKind::Personal).then_some(dto.online),
            last_message_preview: dto.last_message,
            last_time: dto.last_time,
            unread_count: dto.unread,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactListResponse {
    pub contacts: Vec<ContactDto>,
}

#[derive(Debug, Deserialize)]
pub struct ContactDto {
    pub id: i64,
    pub display_name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_initials: Option<String>,
    #[serde(default)]
    pub online: bool,
}

impl From<ContactDto> for Contact {
    fn from(dto: ContactDto) -> Self {
        let avatar_initials = dto
            .avatar_initials
            .unwrap_or_else(|| crate::domain::identity::make_initials(&dto.display_name));
        Contact {
            id: dto.id,
            display_name: dto.display_name,
            position: dto.position,
            department: dto.department,
            phone: dto.phone.unwrap_or_default(),
            avatar_initials,
            online: dto.online,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageListResponse {
    pub messages: Vec<MessageDto>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageResponse {
    pub message: MessageDto,
}

#[derive(Debug, Deserialize)]
pub struct MessageDto {
    pub id: i64,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<String>,
    #[serde(default)]
    pub time: String,
    pub sender_id: i64,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub sender_avatar: String,
    #[serde(default)]
    pub own: bool,
}

impl From<MessageDto> for Message {
    fn from(dto: MessageDto) -> Self {
        let kind = match dto.kind.as_deref() {
            Some("file") => MessageKind::File {
                file_name: dto.file_name.unwrap_or_default(),
                file_size: dto.file_size.unwrap_or_default(),
            },
            _ => MessageKind::Text,
        };
        Message {
            id: dto.id,
            sender_id: dto.sender_id,
            sender_name: dto.sender_name,
            sender_avatar: dto.sender_avatar,
            text: dto.text,
            kind,
            time: dto.time,
            own: dto.own,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OpenChatResponse {
    pub chat_id: i64,
}

#[derive(Debug, Serialize)]
pub struct SendCodeRequest<'a> {
    pub action: &'static str,
    pub phone: &'a str,
}

#[derive(Debug, Serialize)]
pub struct VerifyRequest<'a> {
    pub action: &'static str,
    pub phone: &'a str,
    pub code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct OpenChatRequest {
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileRequest<'a> {
    pub display_name: &'a str,
    pub position: &'a str,
    pub department: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UploadAvatarRequest<'a> {
    pub image: String,
    pub content_type: &'a str,
}

/// Error payload the backend attaches to non-2xx answers.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub retry_after: Option<u32>,
}

impl ErrorBody {
    pub fn display_message(&self, status: u16) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| format!("request failed with status {status}"))
    }
}
