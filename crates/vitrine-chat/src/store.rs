//! Session store: the single owner of conversation state.
//!
//! A plain, test-constructible struct. All mutation is sequential with
//! respect to the one conversation the store represents; the orchestrator is
//! the only writer, the UI reads.

use uuid::Uuid;

use vitrine_core::{SessionSummary, TokenUsage};

use crate::message::{ChatMessage, MessageContent, MessageRole};

/// Field patch for in-place message status changes.
///
/// Only loading/error patching is supported; everything else about a message
/// is immutable once appended.
#[derive(Clone, Debug, Default)]
pub struct MessagePatch {
    pub is_loading: Option<bool>,
    pub content: Option<Vec<MessageContent>>,
}

/// Holds the messages, flags, and session bookkeeping of one conversation.
#[derive(Debug, Default)]
pub struct ConversationStore {
    messages: Vec<ChatMessage>,
    session_id: Option<String>,
    sessions: Vec<SessionSummary>,
    is_loading: bool,
    is_typing: bool,
    sessions_loading: bool,
    history_error: Option<String>,
    last_token_usage: Option<TokenUsage>,
}

impl ConversationStore {
    /// Create an empty store for a fresh, unsaved conversation.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------
    // Message operations
    // -----------------------------------------------------------------

    /// Append a new message and return its id so callers can patch it later.
    pub fn add_message(&mut self, role: MessageRole, content: Vec<MessageContent>) -> Uuid {
        let message = ChatMessage::new(role, content);
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// Merge patch fields into an existing message. Unknown ids are ignored.
    pub fn update_message(&mut self, id: Uuid, patch: MessagePatch) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            if let Some(is_loading) = patch.is_loading {
                message.is_loading = is_loading;
            }
            if let Some(content) = patch.content {
                message.content = content;
            }
        }
    }

    /// Wholesale replace, preserving the given order. Used for history loads.
    pub fn set_messages(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
    }

    /// Clear the message list and unset the active session id.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.session_id = None;
    }

    /// Reset to a fresh, unsaved conversation.
    ///
    /// Beyond [`clear_messages`](Self::clear_messages), this also drops the
    /// per-conversation correlation state (token usage, history error) so a
    /// subsequent send is treated as the start of a new exchange.
    pub fn start_new_session(&mut self) {
        self.clear_messages();
        self.last_token_usage = None;
        self.history_error = None;
    }

    // -----------------------------------------------------------------
    // Plain setters
    // -----------------------------------------------------------------

    pub fn set_session_id(&mut self, session_id: Option<String>) {
        self.session_id = session_id;
    }

    pub fn set_sessions(&mut self, sessions: Vec<SessionSummary>) {
        self.sessions = sessions;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn set_typing(&mut self, typing: bool) {
        self.is_typing = typing;
    }

    pub fn set_sessions_loading(&mut self, loading: bool) {
        self.sessions_loading = loading;
    }

    pub fn set_history_error(&mut self, error: Option<String>) {
        self.history_error = error;
    }

    pub fn set_token_usage(&mut self, usage: Option<TokenUsage>) {
        self.last_token_usage = usage;
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn sessions(&self) -> &[SessionSummary] {
        &self.sessions
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn sessions_loading(&self) -> bool {
        self.sessions_loading
    }

    pub fn history_error(&self) -> Option<&str> {
        self.history_error.as_deref()
    }

    pub fn last_token_usage(&self) -> Option<TokenUsage> {
        self.last_token_usage
    }

    /// The most recent message, if any.
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Text of the most recent user message, scanning backwards.
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .and_then(ChatMessage::first_text)
    }
}
