//! Conversational commerce session engine for Vitrine.
//!
//! Turns free-text exchanges with the storefront assistant into structured,
//! renderable conversations: a polymorphic message model, a session store,
//! heuristic commerce-entity extraction, reply content building, a
//! suggested-reply policy, and the session orchestrator tying them together.

pub mod builder;
pub mod error;
pub mod extract;
pub mod message;
pub mod orchestrator;
pub mod store;
pub mod suggest;

pub use builder::{build_reply_content, order_confirmation_id};
pub use error::ChatError;
pub use message::{ChatMessage, MessageContent, MessageRole, QuickReplyAction, QuickReplyOption};
pub use orchestrator::ChatOrchestrator;
pub use store::{ConversationStore, MessagePatch};
pub use suggest::{default_suggestions, post_add_to_cart_suggestions, suggest_replies};
