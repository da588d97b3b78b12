//! Suggested-reply policy.
//!
//! A deterministic rule table evaluated on every assistant turn. Rules are
//! independent and additive; the default set applies only when no rule
//! fired. The output fully replaces the previous suggestion list.

use vitrine_core::ProductSearchResult;

use crate::message::{QuickReplyAction, QuickReplyOption};

/// Propose the next quick-action buttons for an assistant turn.
pub fn suggest_replies(
    response_text: &str,
    products: &[ProductSearchResult],
) -> Vec<QuickReplyOption> {
    let lower = response_text.to_lowercase();
    let mut options = Vec::new();

    if !products.is_empty() {
        options.push(QuickReplyOption::new(
            "show-more",
            "Show more",
            QuickReplyAction::SendMessage {
                message: "Show me more products".to_string(),
            },
        ));
        options.push(QuickReplyOption::new(
            "view-cart",
            "View Cart",
            QuickReplyAction::ViewCart,
        ));
    }

    if lower.contains("cart") || lower.contains("added") {
        options.push(QuickReplyOption::new(
            "checkout",
            "Checkout",
            QuickReplyAction::SendMessage {
                message: "I want to checkout".to_string(),
            },
        ));
        options.push(QuickReplyOption::new(
            "continue-shopping",
            "Continue Shopping",
            QuickReplyAction::SendMessage {
                message: "Show me more products".to_string(),
            },
        ));
    }

    if lower.contains("voucher") || lower.contains("discount") {
        options.push(QuickReplyOption::new(
            "apply-voucher",
            "Apply Voucher",
            QuickReplyAction::SendMessage {
                message: "What vouchers are available?".to_string(),
            },
        ));
    }

    if options.is_empty() {
        return default_suggestions();
    }
    options
}

/// The fixed fallback set shown when no rule fired (and on a fresh
/// conversation).
pub fn default_suggestions() -> Vec<QuickReplyOption> {
    vec![
        QuickReplyOption::new(
            "browse-products",
            "Browse Products",
            QuickReplyAction::SendMessage {
                message: "Show me some products".to_string(),
            },
        ),
        QuickReplyOption::new("view-cart", "View Cart", QuickReplyAction::ViewCart),
        QuickReplyOption::new(
            "current-deals",
            "Current Deals",
            QuickReplyAction::SendMessage {
                message: "What deals are available today?".to_string(),
            },
        ),
        QuickReplyOption::new(
            "help",
            "Help",
            QuickReplyAction::SendMessage {
                message: "What can you help me with?".to_string(),
            },
        ),
    ]
}

/// The fixed trio offered right after a successful add-to-cart.
pub fn post_add_to_cart_suggestions() -> Vec<QuickReplyOption> {
    vec![
        QuickReplyOption::new("view-cart", "View Cart", QuickReplyAction::ViewCart),
        QuickReplyOption::new("checkout", "Checkout", QuickReplyAction::Checkout),
        QuickReplyOption::new(
            "continue-shopping",
            "Continue Shopping",
            QuickReplyAction::SendMessage {
                message: "Show me more products".to_string(),
            },
        ),
    ]
}
