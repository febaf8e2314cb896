/// Kind of conversation thread for presentation and presence rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatKind {
    /// Private 1-to-1 conversation with a colleague.
    #[default]
    Personal,
    /// Group chat (department, project, board).
    Group,
    /// Conversation with a corporate bot.
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub chat_id: i64,
    pub kind: ChatKind,
    pub name: String,
    pub avatar_initials: String,
    /// Presence of the other party; only meaningful for personal chats.
    pub online: Option<bool>,
    pub last_message_preview: String,
    pub last_time: String,
    /// Server-authoritative; the client never decrements it locally.
    pub unread_count: u32,
}
