//! Heuristic extraction of commerce entities from assistant reply text.
//!
//! Pure, total functions: extraction never fails, absence of a match yields
//! an empty set / `None`, so these can be fuzzed independently of any
//! network state.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

// =============================================================================
// Compiled regex sets (compiled once, reused across calls)
// =============================================================================

static PRODUCT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bproduct\s+id\b[\s:#.,\-]*(\d+)").expect("Invalid product id regex"));

/// Order-id patterns, tried in priority order: the first listed pattern that
/// matches anywhere in the text wins, even if a later one would also match.
static ORDER_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "order ID: 9981"
        r"(?i)\border\s+id\s*:\s*#?(\d+)",
        // "order number: 9981" / "order #9981"
        r"(?i)\border\s+(?:number|#)\s*:?\s*(\d+)",
        // "order ID is 9981" / "order is 9981" / "order: 9981"
        r"(?i)\border\s*(?:id|number|#)?\s*(?:is|:)\s*#?(\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid order id regex"))
    .collect()
});

/// Markdown emphasis markers stripped before order-id matching, so that
/// "**Order ID:** 9981" still matches.
static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*_]+").expect("Invalid emphasis regex"));

/// Phrases that mark a reply as referring to the shopper's cart.
static CART_PHRASES: &[&str] = &[
    "in your cart",
    "your cart",
    "cart contains",
    "items in cart",
    "here's what's in your cart",
];

/// Phrases that mark a reply as confirming a placed order.
static CONFIRMATION_PHRASES: &[&str] = &[
    "order has been placed",
    "placed successfully",
    "order confirmed",
];

// =============================================================================
// Extraction functions
// =============================================================================

/// Collect every product id mentioned as "Product ID <n>" (any casing,
/// punctuation, or spacing between the label and the number). Deduplicated;
/// order not significant.
pub fn extract_product_ids(text: &str) -> BTreeSet<i64> {
    PRODUCT_ID_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<i64>().ok())
        .collect()
}

/// Extract an order id from reply text, if one is mentioned.
///
/// Strips markdown emphasis first, then tries the patterns in fixed
/// priority order and returns the first capturing-group match.
pub fn extract_order_id(text: &str) -> Option<String> {
    let plain = EMPHASIS_RE.replace_all(text, "");
    for re in ORDER_ID_PATTERNS.iter() {
        if let Some(caps) = re.captures(&plain) {
            if let Some(m) = caps.get(1) {
                return Some(m.as_str().to_string());
            }
        }
    }
    None
}

/// Whether the reply is talking about the shopper's cart.
pub fn is_cart_context(text: &str) -> bool {
    let lower = text.to_lowercase();
    CART_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Whether the reply confirms a placed order.
///
/// True only if an order id was actually extracted AND the text carries a
/// confirmation phrase.
pub fn is_order_confirmation(text: &str, order_id: Option<&str>) -> bool {
    if order_id.is_none() {
        return false;
    }
    let lower = text.to_lowercase();
    CONFIRMATION_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase))
}
