//! Chat synchronization engine: observable chat list and active-conversation
//! state kept consistent with the server under a polling discipline.
//!
//! Reconciliation is full replacement: every poll tick re-fetches the active
//! chat's messages and the last-fetched state wins. Stale responses are
//! fenced by tagging each in-flight load with the chat id it was issued for.

use crate::{
    api::ApiError,
    domain::{
        chat::ChatSummary, chat_list_state::ChatListState, contact::Contact,
        conversation::ConversationState, message::Message,
    },
};

/// Session-scoped server operations the engine needs. Single attempt per
/// call; the engine owns all retry/backoff decisions (there are none).
pub trait SyncApi {
    fn list_chats(&self) -> Result<Vec<ChatSummary>, ApiError>;
    fn list_contacts(&self) -> Result<Vec<Contact>, ApiError>;
    fn list_messages(&self, chat_id: i64) -> Result<Vec<Message>, ApiError>;
    fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, ApiError>;
    fn open_chat(&self, contact_id: i64) -> Result<i64, ApiError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    EmptyDraft,
    NoActiveChat,
    Api(ApiError),
}

/// Tag for one in-flight message load. A completion is applied only while
/// its chat is still the active one; late responses for a deselected chat
/// are discarded.
#[derive(Debug)]
pub struct MessageLoadTicket {
    chat_id: i64,
}

impl MessageLoadTicket {
    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }
}

#[derive(Debug)]
pub struct ChatSyncEngine {
    chat_list: ChatListState,
    conversation: ConversationState,
    contacts: Vec<Contact>,
    draft: String,
    poll_interval: u32,
    ticks_until_poll: Option<u32>,
    last_error: Option<ApiError>,
}

impl ChatSyncEngine {
    pub fn new(poll_interval: u32) -> Self {
        Self {
            chat_list: ChatListState::default(),
            conversation: ConversationState::default(),
            contacts: Vec::new(),
            draft: String::new(),
            poll_interval: poll_interval.max(1),
            ticks_until_poll: None,
            last_error: None,
        }
    }

    pub fn chat_list(&self) -> &ChatListState {
        &self.chat_list
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: &str) {
        self.draft = text.to_owned();
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    pub fn take_last_error(&mut self) -> Option<ApiError> {
        self.last_error.take()
    }

    /// Initial load after identity acquisition: chat list and contact list
    /// are independent, then the first chat (server order) becomes active
    /// and its messages are loaded.
    pub fn start(&mut self, api: &dyn SyncApi) {
        self.refresh_chat_list(api);
        self.refresh_contacts(api);

        if self.chat_list.active_chat_id().is_some() {
            self.reload_active_messages(api);
            self.arm_poll_timer();
        }
    }

    /// Activates a chat from the known set and fully reloads its messages,
    /// discarding the previous conversation. Rebinds the poll timer.
    pub fn select_chat(&mut self, api: &dyn SyncApi, chat_id: i64) -> bool {
        if !self.chat_list.activate(chat_id) {
            return false;
        }

        self.reload_active_messages(api);
        self.arm_poll_timer();
        true
    }

    /// Starts a conversation from a contact: chat creation/lookup by contact
    /// id, then a chat-list refresh and a switch to the new chat. Failure
    /// leaves local state untouched.
    pub fn start_chat_with(&mut self, api: &dyn SyncApi, contact_id: i64) -> Result<i64, ApiError> {
        let chat_id = api.open_chat(contact_id)?;

        self.refresh_chat_list(api);
        if self.chat_list.activate(chat_id) {
            self.reload_active_messages(api);
            self.arm_poll_timer();
        }
        Ok(chat_id)
    }

    /// One engine tick. Every `poll_interval` ticks the active chat's
    /// messages are re-fetched and replaced wholesale.
    pub fn on_tick(&mut self, api: &dyn SyncApi) {
        let Some(remaining) = self.ticks_until_poll.as_mut() else {
            return;
        };

        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.reload_active_messages(api);
            self.arm_poll_timer();
        }
    }

    pub fn advance(&mut self, api: &dyn SyncApi, ticks: u32) {
        for _ in 0..ticks {
            self.on_tick(api);
        }
    }

    /// Issues a message load for the active chat. The returned ticket must
    /// be passed back to [`Self::complete_message_load`] with the result.
    pub fn begin_message_load(&mut self) -> Option<MessageLoadTicket> {
        let chat_id = self.chat_list.active_chat_id()?;
        self.conversation.begin_load(chat_id);
        Some(MessageLoadTicket { chat_id })
    }

    /// Applies a finished load. A response tagged with a chat that is no
    /// longer active is dropped: displayed messages always belong to the
    /// currently selected chat.
    pub fn complete_message_load(
        &mut self,
        ticket: MessageLoadTicket,
        result: Result<Vec<Message>, ApiError>,
    ) {
        if self.chat_list.active_chat_id() != Some(ticket.chat_id) {
            tracing::debug!(chat_id = ticket.chat_id, "discarding stale message load");
            return;
        }

        match result {
            Ok(messages) => self.conversation.replace_all(messages),
            Err(err) => {
                self.conversation.set_error();
                self.last_error = Some(err);
            }
        }
    }

    /// Optimistic-append send: the draft is cleared immediately; the message
    /// joins the visible list only once the server confirms it, followed by
    /// a chat-list refresh so previews and unread counts stay
    /// server-authoritative. On failure the draft is restored.
    pub fn submit_draft(&mut self, api: &dyn SyncApi) -> Result<(), SendError> {
        let original = std::mem::take(&mut self.draft);
        let text = original.trim().to_owned();
        if text.is_empty() {
            return Err(SendError::EmptyDraft);
        }
        let Some(chat_id) = self.chat_list.active_chat_id() else {
            self.draft = original;
            return Err(SendError::NoActiveChat);
        };

        match api.send_message(chat_id, &text) {
            Ok(message) => {
                if self.chat_list.active_chat_id() == Some(chat_id) {
                    self.conversation.append_confirmed(message);
                }
                self.refresh_chat_list(api);
                Ok(())
            }
            Err(err) => {
                self.draft = original;
                Err(SendError::Api(err))
            }
        }
    }

    /// Deselects the active chat and tears the poll timer down.
    pub fn close_conversation(&mut self) {
        self.chat_list.clear_active();
        self.conversation.close();
        self.ticks_until_poll = None;
    }

    pub fn refresh_chat_list(&mut self, api: &dyn SyncApi) {
        match api.list_chats() {
            Ok(chats) => self.chat_list.set_ready(chats),
            Err(err) => {
                self.chat_list.set_error();
                self.last_error = Some(err);
            }
        }
    }

    fn refresh_contacts(&mut self, api: &dyn SyncApi) {
        match api.list_contacts() {
            Ok(contacts) => self.contacts = contacts,
            Err(err) => {
                self.last_error = Some(err);
            }
        }
    }

    fn reload_active_messages(&mut self, api: &dyn SyncApi) {
        if let Some(ticket) = self.begin_message_load() {
            let result = api.list_messages(ticket.chat_id());
            self.complete_message_load(ticket, result);
        }
    }

    fn arm_poll_timer(&mut self) {
        self.ticks_until_poll = Some(self.poll_interval);
    }
}
