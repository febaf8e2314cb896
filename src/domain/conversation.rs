use super::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationPhase {
    Empty,
    Loading,
    Ready,
    Error,
}

/// Messages of the active chat. Append-only from the client's perspective
/// except for the full reconciling replacement a poll tick performs; a failed
/// load keeps whatever was on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    chat_id: Option<i64>,
    messages: Vec<Message>,
    phase: ConversationPhase,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            chat_id: None,
            messages: Vec::new(),
            phase: ConversationPhase::Empty,
        }
    }
}

impl ConversationState {
    pub fn chat_id(&self) -> Option<i64> {
        self.chat_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> ConversationPhase {
        self.phase
    }

    /// Switches the conversation to another chat, discarding the previous
    /// chat's messages.
    pub fn begin_load(&mut self, chat_id: i64) {
        if self.chat_id != Some(chat_id) {
            self.messages.clear();
        }
        self.chat_id = Some(chat_id);
        self.phase = ConversationPhase::Loading;
    }

    /// Reconciliation point: the server's response replaces the list
    /// wholesale, no client-side diffing.
    pub fn replace_all(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.phase = ConversationPhase::Ready;
    }

    /// Server-confirmed send; the canonical record lands at the end. A poll
    /// tick may briefly duplicate it until the next full replacement.
    pub fn append_confirmed(&mut self, message: Message) {
        self.messages.push(message);
        self.phase = ConversationPhase::Ready;
    }

    /// Non-destructive failure: prior messages stay visible.
    pub fn set_error(&mut self) {
        self.phase = ConversationPhase::Error;
    }

    pub fn close(&mut self) {
        self.chat_id = None;
        self.messages.clear();
        self.phase = ConversationPhase::Empty;
    }
}
