//! Session orchestrator: the stateful coordinator of one conversation.
//!
//! Sends messages, manages session lifecycle (new/switch/delete/history
//! load), applies the reply content builder and suggested-reply policy, and
//! dispatches quick replies. Backend failures during a send are converted
//! into in-conversation error content; nothing here is fatal.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};
use uuid::Uuid;

use vitrine_backend::wire::HistoryMessage;
use vitrine_backend::StorefrontBackend;
use vitrine_core::config::ChatSettings;
use vitrine_core::{SessionSummary, TokenUsage};

use crate::builder::build_reply_content;
use crate::error::ChatError;
use crate::message::{
    ChatMessage, MessageContent, MessageRole, QuickReplyAction, QuickReplyOption,
};
use crate::store::ConversationStore;
use crate::suggest::{default_suggestions, post_add_to_cart_suggestions, suggest_replies};

/// Coordinates one conversation between the shopper and the assistant.
///
/// Only one send is expected in flight per conversation; overlapping sends
/// still execute, but message ordering across them is best-effort (a human
/// cannot submit fast enough to race meaningfully).
pub struct ChatOrchestrator {
    backend: Arc<dyn StorefrontBackend>,
    store: Mutex<ConversationStore>,
    suggestions: Mutex<Vec<QuickReplyOption>>,
    cart_count: Mutex<Option<u64>>,
    settings: ChatSettings,
}

impl ChatOrchestrator {
    /// Create an orchestrator over a fresh, unsaved conversation.
    pub fn new(backend: Arc<dyn StorefrontBackend>, settings: ChatSettings) -> Self {
        Self {
            backend,
            store: Mutex::new(ConversationStore::new()),
            suggestions: Mutex::new(default_suggestions()),
            cart_count: Mutex::new(None),
            settings,
        }
    }

    // -----------------------------------------------------------------
    // Sending
    // -----------------------------------------------------------------

    /// Send one user message to the assistant.
    ///
    /// No-op if the text trims to empty. The user message is appended
    /// optimistically before the backend call; on failure the assistant turn
    /// becomes an error content block and the conversation stays usable.
    pub async fn send_message(&self, text: &str) -> Result<(), ChatError> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Ok(());
        }
        if text.chars().count() > self.settings.max_message_length {
            return Err(ChatError::MessageTooLong(self.settings.max_message_length));
        }

        let session_id = {
            let mut store = self.store_mut()?;
            store.set_loading(true);
            store.set_typing(true);
            store.add_message(
                MessageRole::User,
                vec![MessageContent::Text { text: text.clone() }],
            );
            store.session_id().map(str::to_string)
        };

        match self.backend.send_chat(&text, session_id.as_deref()).await {
            Ok(resp) => {
                let products = resp.products.unwrap_or_default();
                let content = build_reply_content(&resp.response, &products);
                {
                    let mut store = self.store_mut()?;
                    store.set_typing(false);
                    if store.session_id().is_none() {
                        store.set_session_id(Some(resp.session_id.clone()));
                    }
                    if !content.is_empty() {
                        store.add_message(MessageRole::Assistant, content);
                    }
                    store.set_token_usage(resp.token_usage);
                }
                *self.suggestions_mut()? = suggest_replies(&resp.response, &products);

                // A brand-new session should appear in the shopper's history
                // list right away; guests have no history to refresh.
                if self.backend.is_authenticated() {
                    self.load_sessions().await?;
                }
            }
            Err(e) => {
                warn!("Chat send failed: {e}");
                let mut store = self.store_mut()?;
                store.set_typing(false);
                store.add_message(
                    MessageRole::Assistant,
                    vec![MessageContent::Error {
                        message: e.to_string(),
                        code: None,
                    }],
                );
            }
        }

        self.store_mut()?.set_loading(false);
        Ok(())
    }

    /// Resend the most recent user message, if the conversation currently
    /// ends in an error turn; otherwise a no-op.
    ///
    /// The failed user message is not removed or deduplicated: the retry
    /// appends a fresh user entry (replay semantics).
    pub async fn retry(&self) -> Result<(), ChatError> {
        let text = {
            let store = self.store_mut()?;
            let retryable = store
                .last_message()
                .map(|m| m.role == MessageRole::Assistant && m.has_error_content())
                .unwrap_or(false);
            if !retryable {
                return Ok(());
            }
            store.last_user_text().map(str::to_string)
        };
        match text {
            Some(text) => self.send_message(&text).await,
            None => Ok(()),
        }
    }

    // -----------------------------------------------------------------
    // Quick replies & cart
    // -----------------------------------------------------------------

    /// Dispatch a quick-reply button purely by its action type.
    ///
    /// Most actions translate into a synthetic send with backend-facing
    /// natural-language text. `add_to_cart` mutates the cart directly
    /// instead of going through the assistant, and `navigate` is the
    /// caller's responsibility.
    pub async fn handle_quick_reply(&self, option: &QuickReplyOption) -> Result<(), ChatError> {
        match &option.action {
            QuickReplyAction::SendMessage { message } => self.send_message(message).await,
            QuickReplyAction::ViewCart => self.send_message("Show me my cart").await,
            QuickReplyAction::Checkout => self.send_message("I want to checkout").await,
            QuickReplyAction::ApplyVoucher { code } => {
                self.send_message(&format!("Apply voucher {code}")).await
            }
            QuickReplyAction::ViewProduct { product_id } => {
                self.send_message(&format!("Tell me more about Product ID {product_id}"))
                    .await
            }
            QuickReplyAction::AddToCart { product_id } => {
                self.handle_add_to_cart(*product_id).await
            }
            QuickReplyAction::Navigate { path } => {
                debug!(path = %path, "Navigation is the caller's responsibility");
                Ok(())
            }
        }
    }

    /// Add a product to the cart directly, bypassing the assistant.
    ///
    /// On success refreshes the cart item count and synthesizes an assistant
    /// confirmation plus the fixed post-add suggestion trio. On failure
    /// appends an error content message; no automatic retry.
    pub async fn handle_add_to_cart(&self, product_id: i64) -> Result<(), ChatError> {
        match self.backend.add_to_cart(product_id).await {
            Ok(_) => {
                let count = match self.backend.cart_count().await {
                    Ok(count) => {
                        *self.cart_count_mut()? = Some(count);
                        Some(count)
                    }
                    Err(e) => {
                        warn!("Cart count refresh failed: {e}");
                        None
                    }
                };
                let text = match count {
                    Some(1) => "Added to your cart! You now have 1 item in your cart.".to_string(),
                    Some(n) => format!("Added to your cart! You now have {n} items in your cart."),
                    None => "Added to your cart!".to_string(),
                };
                self.store_mut()?
                    .add_message(MessageRole::Assistant, vec![MessageContent::Text { text }]);
                *self.suggestions_mut()? = post_add_to_cart_suggestions();
            }
            Err(e) => {
                warn!("Add to cart failed for product {product_id}: {e}");
                self.store_mut()?.add_message(
                    MessageRole::Assistant,
                    vec![MessageContent::Error {
                        message: format!("Couldn't add that to your cart: {e}"),
                        code: None,
                    }],
                );
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Session lifecycle
    // -----------------------------------------------------------------

    /// Refresh the shopper's session list.
    ///
    /// A load failure is logged and surfaced as an empty list, never as an
    /// error to the caller.
    pub async fn load_sessions(&self) -> Result<(), ChatError> {
        self.store_mut()?.set_sessions_loading(true);
        let result = self
            .backend
            .list_sessions(self.settings.session_list_limit)
            .await;
        let mut store = self.store_mut()?;
        store.set_sessions_loading(false);
        match result {
            Ok(resp) => store.set_sessions(resp.sessions),
            Err(e) => {
                warn!("Session list load failed: {e}");
                store.set_sessions(Vec::new());
            }
        }
        Ok(())
    }

    /// Make `session` the active conversation, replacing the message list
    /// with its full history. No-op if it is already active.
    pub async fn switch_session(&self, session: &SessionSummary) -> Result<(), ChatError> {
        let already_active = {
            let store = self.store_mut()?;
            store.session_id() == Some(session.session_id.as_str())
        };
        if already_active {
            return Ok(());
        }

        match self.backend.session_history(&session.session_id).await {
            Ok(history) => {
                let messages: Vec<ChatMessage> =
                    history.messages.iter().map(ingest_history_message).collect();
                {
                    let mut store = self.store_mut()?;
                    store.set_messages(messages);
                    store.set_session_id(Some(history.session_id));
                    store.set_history_error(None);
                }
                *self.suggestions_mut()? = default_suggestions();
            }
            Err(e) => {
                warn!("History load failed for session {}: {e}", session.session_id);
                self.store_mut()?.set_history_error(Some(e.to_string()));
            }
        }
        Ok(())
    }

    /// Reset to a fresh, unsaved conversation.
    pub fn start_new_session(&self) -> Result<(), ChatError> {
        self.store_mut()?.start_new_session();
        *self.suggestions_mut()? = default_suggestions();
        Ok(())
    }

    /// Clear the message list and unset the active session id.
    pub fn clear_messages(&self) -> Result<(), ChatError> {
        self.store_mut()?.clear_messages();
        *self.suggestions_mut()? = default_suggestions();
        Ok(())
    }

    /// Delete a session remotely and drop it from the local list. Deleting
    /// the active session behaves as [`start_new_session`](Self::start_new_session).
    pub async fn delete_session(&self, session_id: &str) -> Result<(), ChatError> {
        self.backend.delete_session(session_id).await?;
        let was_active = {
            let mut store = self.store_mut()?;
            let remaining: Vec<SessionSummary> = store
                .sessions()
                .iter()
                .filter(|s| s.session_id != session_id)
                .cloned()
                .collect();
            store.set_sessions(remaining);
            store.session_id() == Some(session_id)
        };
        if was_active {
            self.start_new_session()?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------

    /// Snapshot of the conversation's messages, in insertion order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.store
            .lock()
            .map(|s| s.messages().to_vec())
            .unwrap_or_default()
    }

    /// The active session id, if the conversation has been saved.
    pub fn session_id(&self) -> Option<String> {
        self.store
            .lock()
            .ok()
            .and_then(|s| s.session_id().map(str::to_string))
    }

    /// The shopper's known past sessions.
    pub fn sessions(&self) -> Vec<SessionSummary> {
        self.store
            .lock()
            .map(|s| s.sessions().to_vec())
            .unwrap_or_default()
    }

    /// The current quick-reply suggestions.
    pub fn suggestions(&self) -> Vec<QuickReplyOption> {
        self.suggestions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.store.lock().map(|s| s.is_loading()).unwrap_or(false)
    }

    pub fn is_typing(&self) -> bool {
        self.store.lock().map(|s| s.is_typing()).unwrap_or(false)
    }

    /// Error string from the most recent failed history load, if any.
    pub fn history_error(&self) -> Option<String> {
        self.store
            .lock()
            .ok()
            .and_then(|s| s.history_error().map(str::to_string))
    }

    /// Token accounting from the most recent assistant turn.
    pub fn last_token_usage(&self) -> Option<TokenUsage> {
        self.store.lock().ok().and_then(|s| s.last_token_usage())
    }

    /// The most recently fetched cart item count.
    pub fn cart_count(&self) -> Option<u64> {
        self.cart_count.lock().ok().and_then(|c| *c)
    }

    // -- Private helpers --

    fn store_mut(&self) -> Result<MutexGuard<'_, ConversationStore>, ChatError> {
        self.store
            .lock()
            .map_err(|e| ChatError::StoreLock(e.to_string()))
    }

    fn suggestions_mut(&self) -> Result<MutexGuard<'_, Vec<QuickReplyOption>>, ChatError> {
        self.suggestions
            .lock()
            .map_err(|e| ChatError::StoreLock(e.to_string()))
    }

    fn cart_count_mut(&self) -> Result<MutexGuard<'_, Option<u64>>, ChatError> {
        self.cart_count
            .lock()
            .map_err(|e| ChatError::StoreLock(e.to_string()))
    }
}

/// Convert one persisted history turn into a store message.
///
/// The wire role for assistant turns is `"model"`.
fn ingest_history_message(msg: &HistoryMessage) -> ChatMessage {
    let role = match msg.role.as_str() {
        "user" => MessageRole::User,
        "model" | "assistant" => MessageRole::Assistant,
        _ => MessageRole::System,
    };
    ChatMessage {
        id: Uuid::new_v4(),
        role,
        content: vec![MessageContent::Text {
            text: msg.content.clone(),
        }],
        timestamp: msg.created_at,
        is_loading: false,
    }
}

// =============================================================================
// Tests
// =============================================================================
