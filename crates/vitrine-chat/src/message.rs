//! Renderable vocabulary of a conversation turn.
//!
//! A [`ChatMessage`] carries an ordered sequence of [`MessageContent`]
//! blocks; renderers walk the sequence in order and skip anything they do
//! not recognize. Pure data, no side effects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vitrine_core::{
    CartSummary, OrderSummary, ProductCategory, ProductSearchResult, Voucher,
};

// =============================================================================
// Roles
// =============================================================================

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

// =============================================================================
// Content variants
// =============================================================================

/// One renderable payload attached to a message.
///
/// The set of variants is closed; `Unknown` exists only so that payloads
/// produced by a newer backend deserialize into a render-nothing no-op
/// instead of failing the whole message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text {
        text: String,
    },
    ProductCard {
        product: ProductSearchResult,
    },
    ProductList {
        products: Vec<ProductSearchResult>,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        show_add_to_cart: bool,
    },
    CartSummary {
        cart: CartSummary,
    },
    OrderSummary {
        order: OrderSummary,
    },
    VoucherCard {
        voucher: Voucher,
    },
    CategoryList {
        categories: Vec<ProductCategory>,
    },
    QuickReplies {
        options: Vec<QuickReplyOption>,
    },
    Error {
        message: String,
        #[serde(default)]
        code: Option<String>,
    },
    /// Forward-compatibility catch-all; renders as nothing.
    #[serde(other)]
    Unknown,
}

impl MessageContent {
    /// Plain text of a `Text` block, if this is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Whether this block is an `Error`.
    pub fn is_error(&self) -> bool {
        matches!(self, MessageContent::Error { .. })
    }
}

// =============================================================================
// Quick replies
// =============================================================================

/// Canned action bound to a quick-reply button.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuickReplyAction {
    SendMessage { message: String },
    Navigate { path: String },
    AddToCart { product_id: i64 },
    ViewProduct { product_id: i64 },
    ApplyVoucher { code: String },
    ViewCart,
    Checkout,
}

/// A proposed next user action rendered as a button.
///
/// Options are ephemeral: the policy replaces the whole list on every
/// assistant turn, never merges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuickReplyOption {
    pub id: String,
    pub label: String,
    pub action: QuickReplyAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl QuickReplyOption {
    /// Convenience constructor without an icon.
    pub fn new(id: &str, label: &str, action: QuickReplyAction) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            action,
            icon: None,
        }
    }
}

// =============================================================================
// ChatMessage
// =============================================================================

/// One message in a conversation.
///
/// Immutable once appended except for loading/error status patching; owned
/// exclusively by the session store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: Vec<MessageContent>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_loading: bool,
}

impl ChatMessage {
    /// Create a message with a fresh id and the current timestamp.
    pub fn new(role: MessageRole, content: Vec<MessageContent>) -> Self {
        debug_assert!(!content.is_empty(), "message content must be non-empty");
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            timestamp: Utc::now(),
            is_loading: false,
        }
    }

    /// Whether any content block is an error.
    pub fn has_error_content(&self) -> bool {
        self.content.iter().any(MessageContent::is_error)
    }

    /// Text of the first `Text` block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(MessageContent::as_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_tagged_wire_format() {
        let content = MessageContent::Text {
            text: "hello".to_string(),
        };
        let json = serde_json::to_string(&content).unwrap();
        assert_eq!(json, r#"{"type":"text","text":"hello"}"#);
    }

    #[test]
    fn test_unknown_variant_deserializes_as_noop() {
        let json = r#"{"type":"holographic_banner","pixels":"..."} "#;
        let content: MessageContent = serde_json::from_str(json).unwrap();
        assert_eq!(content, MessageContent::Unknown);
    }

    #[test]
    fn test_product_list_roundtrip() {
        let content = MessageContent::ProductList {
            products: vec![ProductSearchResult {
                product_id: 7,
                product_name: "Denim Jacket".to_string(),
                product_brand: "BrandName".to_string(),
                retail_price: 59.99,
                department: "Women".to_string(),
                category_name: None,
                stock_status: None,
            }],
            title: Some("Products for you".to_string()),
            show_add_to_cart: true,
        };
        let json = serde_json::to_string(&content).unwrap();
        let back: MessageContent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, content);
    }

    #[test]
    fn test_quick_reply_action_wire_format() {
        let action = QuickReplyAction::AddToCart { product_id: 42 };
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"type":"add_to_cart","product_id":42}"#);

        let action: QuickReplyAction = serde_json::from_str(r#"{"type":"view_cart"}"#).unwrap();
        assert_eq!(action, QuickReplyAction::ViewCart);
    }

    #[test]
    fn test_new_message_has_id_and_timestamp() {
        let msg = ChatMessage::new(
            MessageRole::User,
            vec![MessageContent::Text {
                text: "hi".to_string(),
            }],
        );
        assert_ne!(msg.id, Uuid::nil());
        assert!(!msg.is_loading);
        assert_eq!(msg.role, MessageRole::User);
    }

    #[test]
    fn test_has_error_content() {
        let msg = ChatMessage::new(
            MessageRole::Assistant,
            vec![
                MessageContent::Text {
                    text: "something went wrong".to_string(),
                },
                MessageContent::Error {
                    message: "network down".to_string(),
                    code: None,
                },
            ],
        );
        assert!(msg.has_error_content());

        let msg = ChatMessage::new(
            MessageRole::Assistant,
            vec![MessageContent::Text {
                text: "all good".to_string(),
            }],
        );
        assert!(!msg.has_error_content());
    }

    #[test]
    fn test_first_text_skips_non_text_blocks() {
        let msg = ChatMessage::new(
            MessageRole::Assistant,
            vec![
                MessageContent::Unknown,
                MessageContent::Text {
                    text: "found me".to_string(),
                },
            ],
        );
        assert_eq!(msg.first_text(), Some("found me"));
    }

    #[test]
    fn test_content_order_survives_roundtrip() {
        let msg = ChatMessage::new(
            MessageRole::Assistant,
            vec![
                MessageContent::Text {
                    text: "first".to_string(),
                },
                MessageContent::QuickReplies {
                    options: vec![QuickReplyOption::new(
                        "checkout",
                        "Checkout",
                        QuickReplyAction::Checkout,
                    )],
                },
            ],
        );
        let json = serde_json::to_string(&msg).unwrap();
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.content, msg.content);
    }
}
