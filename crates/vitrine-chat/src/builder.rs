//! Builds the renderable content of one assistant turn.
//!
//! Converts a raw assistant response (text plus optional product hints) into
//! an ordered sequence of message content blocks, using entity extraction to
//! filter and annotate.

use vitrine_core::ProductSearchResult;

use crate::extract::{extract_order_id, extract_product_ids, is_cart_context, is_order_confirmation};
use crate::message::MessageContent;

/// Title shown above a product list when the reply describes the cart.
const CART_LIST_TITLE: &str = "Items in your cart";
/// Title shown above a product list in the general recommendation case.
const BROWSE_LIST_TITLE: &str = "Products for you";

/// Build the ordered content blocks for a single assistant turn.
///
/// Text comes first when present. At most one product list follows: if the
/// reply mentions specific product ids, the hint list is filtered to those;
/// a filter that matches nothing falls back to the full unfiltered list
/// (showing something beats showing nothing). A cart-context reply renders
/// the list as a read-only cart view.
pub fn build_reply_content(
    response_text: &str,
    products: &[ProductSearchResult],
) -> Vec<MessageContent> {
    let mut content = Vec::new();

    if !response_text.is_empty() {
        content.push(MessageContent::Text {
            text: response_text.to_string(),
        });
    }

    if !products.is_empty() {
        let mentioned = extract_product_ids(response_text);
        let selected: Vec<ProductSearchResult> = if mentioned.is_empty() {
            products.to_vec()
        } else {
            let filtered: Vec<ProductSearchResult> = products
                .iter()
                .filter(|p| mentioned.contains(&p.product_id))
                .cloned()
                .collect();
            if filtered.is_empty() {
                products.to_vec()
            } else {
                filtered
            }
        };

        let cart_view = is_cart_context(response_text);
        content.push(MessageContent::ProductList {
            products: selected,
            title: Some(
                if cart_view {
                    CART_LIST_TITLE
                } else {
                    BROWSE_LIST_TITLE
                }
                .to_string(),
            ),
            show_add_to_cart: !cart_view,
        });
    }

    content
}

/// The order id of a confirmed order mentioned in reply text, if any.
///
/// Read-only secondary use of extraction: the render layer uses this to
/// offer a "View Order" affordance next to confirmation messages. Not part
/// of content construction.
pub fn order_confirmation_id(response_text: &str) -> Option<String> {
    let order_id = extract_order_id(response_text)?;
    if is_order_confirmation(response_text, Some(&order_id)) {
        Some(order_id)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str) -> ProductSearchResult {
        ProductSearchResult {
            product_id: id,
            product_name: name.to_string(),
            product_brand: "BrandName".to_string(),
            retail_price: 19.99,
            department: "Men".to_string(),
            category_name: None,
            stock_status: None,
        }
    }

    fn list_of(content: &[MessageContent]) -> Option<(&[ProductSearchResult], &str, bool)> {
        content.iter().find_map(|c| match c {
            MessageContent::ProductList {
                products,
                title,
                show_add_to_cart,
            } => Some((
                products.as_slice(),
                title.as_deref().unwrap_or(""),
                *show_add_to_cart,
            )),
            _ => None,
        })
    }

    #[test]
    fn test_text_only_turn() {
        let content = build_reply_content("Hello! How can I help?", &[]);
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].as_text(), Some("Hello! How can I help?"));
    }

    #[test]
    fn test_empty_response_and_no_products_yields_nothing() {
        assert!(build_reply_content("", &[]).is_empty());
    }

    #[test]
    fn test_text_precedes_product_list() {
        let products = vec![product(1, "Shirt")];
        let content = build_reply_content("Here are some options", &products);
        assert_eq!(content.len(), 2);
        assert!(matches!(content[0], MessageContent::Text { .. }));
        assert!(matches!(content[1], MessageContent::ProductList { .. }));
    }

    #[test]
    fn test_products_without_text_still_render() {
        let products = vec![product(1, "Shirt")];
        let content = build_reply_content("", &products);
        assert_eq!(content.len(), 1);
        assert!(matches!(content[0], MessageContent::ProductList { .. }));
    }

    #[test]
    fn test_mentioned_ids_filter_products() {
        let products = vec![product(5, "Hat"), product(7, "Scarf"), product(9, "Belt")];
        let content =
            build_reply_content("I recommend Product ID: 7, a lovely scarf", &products);
        let (listed, _, _) = list_of(&content).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].product_id, 7);
    }

    #[test]
    fn test_unmatched_mentions_fall_back_to_full_list() {
        let products = vec![product(5, "Hat"), product(7, "Scarf")];
        let content = build_reply_content("Try Product ID: 100", &products);
        let (listed, _, _) = list_of(&content).unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[test]
    fn test_no_mentions_shows_full_list() {
        let products = vec![product(5, "Hat"), product(7, "Scarf")];
        let content = build_reply_content("Here are today's picks", &products);
        let (listed, _, _) = list_of(&content).unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[test]
    fn test_cart_context_list_is_read_only() {
        let products = vec![product(1, "Shirt")];
        let content = build_reply_content("Here's what's in your cart: one shirt", &products);
        let (_, title, show_add) = list_of(&content).unwrap();
        assert_eq!(title, "Items in your cart");
        assert!(!show_add);
    }

    #[test]
    fn test_browse_context_list_allows_add() {
        let products = vec![product(1, "Shirt")];
        let content = build_reply_content("Here are some products for you", &products);
        let (_, title, show_add) = list_of(&content).unwrap();
        assert_eq!(title, "Products for you");
        assert!(show_add);
    }

    #[test]
    fn test_at_most_one_product_list() {
        let products = vec![product(1, "A"), product(2, "B"), product(3, "C")];
        let content = build_reply_content(
            "Product ID: 1 and Product ID: 2 and Product ID: 3",
            &products,
        );
        let lists = content
            .iter()
            .filter(|c| matches!(c, MessageContent::ProductList { .. }))
            .count();
        assert_eq!(lists, 1);
    }

    // ---- Order confirmation affordance ----

    #[test]
    fn test_order_confirmation_id_detected() {
        assert_eq!(
            order_confirmation_id("Your order has been placed! Order ID: 9981").as_deref(),
            Some("9981")
        );
    }

    #[test]
    fn test_order_confirmation_id_requires_confirmation_phrase() {
        assert!(order_confirmation_id("Your order ID: 9981 is still processing").is_none());
        assert!(order_confirmation_id("Your order has been placed!").is_none());
    }
}
