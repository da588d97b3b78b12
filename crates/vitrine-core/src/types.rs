use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Availability status reported by the stock service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    /// Available quantity is above the low-stock threshold.
    InStock,
    /// Available quantity is at or below the low-stock threshold.
    LowStock,
    /// Nothing available for sale.
    OutOfStock,
}

/// How a voucher discount is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Percentage off the subtotal, possibly capped.
    Percentage,
    /// Fixed amount off the subtotal.
    Fixed,
}

// =============================================================================
// Products & categories
// =============================================================================

/// A product as returned inside an assistant reply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductSearchResult {
    pub product_id: i64,
    pub product_name: String,
    pub product_brand: String,
    pub retail_price: f64,
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<StockStatus>,
}

/// A product category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductCategory {
    pub product_category_id: String,
    #[serde(default)]
    pub product_category_name: Option<String>,
}

// =============================================================================
// Stock
// =============================================================================

/// Per-product stock snapshot from the stock service.
///
/// The cart reconciler reads `available_quantity`, `is_track_stock`, and
/// `stock_status`; the remaining fields are carried for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductStock {
    pub product_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    pub stock_quantity: i64,
    pub reserved_quantity: i64,
    pub available_quantity: i64,
    pub low_stock_threshold: i64,
    pub is_track_stock: bool,
    pub stock_status: StockStatus,
}

// =============================================================================
// Cart
// =============================================================================

/// One line of the server-side cart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItemLine {
    pub order_item_id: String,
    pub product_id: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_brand: Option<String>,
    #[serde(default)]
    pub retail_price: Option<f64>,
    #[serde(default)]
    pub department: Option<String>,
}

/// The current cart with its lines and totals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    pub order_id: i64,
    pub customer_id: i64,
    pub status: String,
    pub items: Vec<CartItemLine>,
    pub num_of_item: i64,
    pub total_price: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Orders & vouchers
// =============================================================================

/// A placed order, as rendered in an `order_summary` content block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_id: i64,
    pub customer_id: i64,
    pub status: String,
    pub num_of_item: i64,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub discount_amount: Option<f64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub items: Vec<CartItemLine>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A discount voucher.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    pub voucher_id: String,
    pub voucher_code: String,
    #[serde(default)]
    pub voucher_name: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(default)]
    pub min_purchase_amount: Option<f64>,
    #[serde(default)]
    pub max_discount_amount: Option<f64>,
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
}

// =============================================================================
// Sessions & usage
// =============================================================================

/// A server-tracked conversation session, as listed in session history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    #[serde(default)]
    pub customer_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Token accounting for one assistant turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&StockStatus::InStock).unwrap(),
            "\"IN_STOCK\""
        );
        assert_eq!(
            serde_json::from_str::<StockStatus>("\"OUT_OF_STOCK\"").unwrap(),
            StockStatus::OutOfStock
        );
        assert_eq!(
            serde_json::from_str::<StockStatus>("\"LOW_STOCK\"").unwrap(),
            StockStatus::LowStock
        );
    }

    #[test]
    fn test_product_stock_deserializes_service_payload() {
        let payload = r#"{
            "product_id": 1,
            "product_name": "Classic T-Shirt",
            "stock_quantity": 100,
            "reserved_quantity": 5,
            "available_quantity": 95,
            "low_stock_threshold": 10,
            "is_track_stock": true,
            "stock_status": "IN_STOCK"
        }"#;
        let stock: ProductStock = serde_json::from_str(payload).unwrap();
        assert_eq!(stock.product_id, 1);
        assert_eq!(stock.available_quantity, 95);
        assert!(stock.is_track_stock);
        assert_eq!(stock.stock_status, StockStatus::InStock);
    }

    #[test]
    fn test_product_search_result_optional_fields_default() {
        let payload = r#"{
            "product_id": 7,
            "product_name": "Denim Jacket",
            "product_brand": "BrandName",
            "retail_price": 59.99,
            "department": "Women"
        }"#;
        let product: ProductSearchResult = serde_json::from_str(payload).unwrap();
        assert_eq!(product.product_id, 7);
        assert!(product.category_name.is_none());
        assert!(product.stock_status.is_none());
    }

    #[test]
    fn test_voucher_discount_type_wire_format() {
        let payload = r#"{
            "voucher_id": "voucher_20240131_abc123",
            "voucher_code": "DISCOUNT20",
            "voucher_name": "20% Off All Items",
            "discount_type": "percentage",
            "discount_value": 20.0
        }"#;
        let voucher: Voucher = serde_json::from_str(payload).unwrap();
        assert_eq!(voucher.discount_type, DiscountType::Percentage);
        assert_eq!(voucher.voucher_code, "DISCOUNT20");
    }

    #[test]
    fn test_cart_summary_roundtrip() {
        let cart = CartSummary {
            order_id: 1,
            customer_id: 42,
            status: "Cart".to_string(),
            items: vec![CartItemLine {
                order_item_id: "orderitem_20240131_abc123".to_string(),
                product_id: 1,
                product_name: Some("Classic T-Shirt".to_string()),
                product_brand: None,
                retail_price: Some(29.99),
                department: Some("Men".to_string()),
            }],
            num_of_item: 1,
            total_price: 29.99,
            created_at: None,
        };
        let json = serde_json::to_string(&cart).unwrap();
        let back: CartSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
