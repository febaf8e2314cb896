use super::chat::ChatSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatListPhase {
    Loading,
    Ready,
    Empty,
    Error,
}

/// Observable chat list. Refreshes replace the whole list (server order is
/// authoritative); a failed refresh keeps the previous data and only flips
/// the phase, so the caller can keep rendering what it had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatListState {
    phase: ChatListPhase,
    chats: Vec<ChatSummary>,
    active_chat_id: Option<i64>,
}

impl Default for ChatListState {
    fn default() -> Self {
        Self {
            phase: ChatListPhase::Loading,
            chats: Vec::new(),
            active_chat_id: None,
        }
    }
}

impl ChatListState {
    pub fn phase(&self) -> ChatListPhase {
        self.phase
    }

    pub fn chats(&self) -> &[ChatSummary] {
        &self.chats
    }

    pub fn active_chat_id(&self) -> Option<i64> {
        self.active_chat_id
    }

    pub fn contains(&self, chat_id: i64) -> bool {
        self.chats.iter().any(|chat| chat.chat_id == chat_id)
    }

    /// Full replacement with the server's latest view. The active chat
    /// survives by id when still present, otherwise falls back to the first
    /// chat in server order.
    pub fn set_ready(&mut self, chats: Vec<ChatSummary>) {
        self.phase = if chats.is_empty() {
            ChatListPhase::Empty
        } else {
            ChatListPhase::Ready
        };
        self.chats = chats;
        self.active_chat_id = self
            .active_chat_id
            .filter(|id| self.contains(*id))
            .or_else(|| self.chats.first().map(|chat| chat.chat_id));
    }

    /// Non-destructive: previous chats and selection stay visible.
    pub fn set_error(&mut self) {
        self.phase = ChatListPhase::Error;
    }

    /// Activates a chat. Returns false for an id outside the known set;
    /// selecting an unknown chat is not a valid transition.
    pub fn activate(&mut self, chat_id: i64) -> bool {
        if !self.contains(chat_id) {
            return false;
        }
        self.active_chat_id = Some(chat_id);
        true
    }

    pub fn clear_active(&mut self) {
        self.active_chat_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::ChatKind;

    fn chat(chat_id: i64, name: &str) -> ChatSummary {
        ChatSummary {
            chat_id,
            kind: ChatKind::Personal,
            name: name.to_owned(),
            avatar_initials: "АМ".to_owned(),
            online: Some(true),
            last_message_preview: String::new(),
            last_time: String::new(),
            unread_count: 0,
        }
    }

    #[test]
    fn default_state_is_loading_without_selection() {
        let state = ChatListState::default();

        assert_eq!(state.phase(), ChatListPhase::Loading);
        assert!(state.chats().is_empty());
        assert_eq!(state.active_chat_id(), None);
    }

    #[test]
    fn first_chat_in_server_order_becomes_active_by_default() {
        let mut state = ChatListState::default();

        state.set_ready(vec![chat(3, "Мария Белова"), chat(1, "ИТ-отдел")]);

        assert_eq!(state.phase(), ChatListPhase::Ready);
        assert_eq!(state.active_chat_id(), Some(3));
    }

    #[test]
    fn empty_payload_transitions_to_empty() {
        let mut state = ChatListState::default();

        state.set_ready(vec![]);

        assert_eq!(state.phase(), ChatListPhase::Empty);
        assert_eq!(state.active_chat_id(), None);
    }

    #[test]
    fn refresh_preserves_active_chat_by_id() {
        let mut state = ChatListState::default();
        state.set_ready(vec![chat(1, "A"), chat(2, "B")]);
        assert!(state.activate(2));

        state.set_ready(vec![chat(5, "C"), chat(2, "B"), chat(9, "D")]);

        assert_eq!(state.active_chat_id(), Some(2));
    }

    #[test]
    fn refresh_falls_back_to_first_when_active_chat_disappears() {
        let mut state = ChatListState::default();
        state.set_ready(vec![chat(1, "A"), chat(2, "B")]);
        assert!(state.activate(2));

        state.set_ready(vec![chat(7, "C")]);

        assert_eq!(state.active_chat_id(), Some(7));
    }

    #[test]
    fn activating_unknown_chat_is_rejected() {
        let mut state = ChatListState::default();
        state.set_ready(vec![chat(1, "A")]);

        assert!(!state.activate(99));
        assert_eq!(state.active_chat_id(), Some(1));
    }

    #[test]
    fn failed_refresh_keeps_previous_chats_and_selection() {
        let mut state = ChatListState::default();
        state.set_ready(vec![chat(1, "A"), chat(2, "B")]);
        assert!(state.activate(2));

        state.set_error();

        assert_eq!(state.phase(), ChatListPhase::Error);
        assert_eq!(state.chats().len(), 2);
        assert_eq!(state.active_chat_id(), Some(2));
    }
}
