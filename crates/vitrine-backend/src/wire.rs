//! Wire DTOs for the storefront REST API.
//!
//! Shapes mirror the backend's pydantic schemas. Every endpoint wraps its
//! payload in a `{status, status_code, message, data}` envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vitrine_core::{ProductSearchResult, SessionSummary, TokenUsage};

// =============================================================================
// Envelope
// =============================================================================

/// Standard response envelope used by every endpoint.
///
/// `data` is absent on some error responses, so it stays optional here and
/// the client decides whether absence is an error.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Envelope<T> {
    pub status: String,
    pub status_code: u16,
    pub message: String,
    #[serde(default = "none", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

// serde(default) on a generic field needs a helper that doesn't bound T: Default
fn none<T>() -> Option<T> {
    None
}

// =============================================================================
// Chat
// =============================================================================

/// `POST /chat` request body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatSendRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// `POST /chat` response payload.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChatSendResponse {
    pub session_id: String,
    pub response: String,
    #[serde(default)]
    pub products: Option<Vec<ProductSearchResult>>,
    #[serde(default)]
    pub token_usage: Option<TokenUsage>,
    pub created_at: DateTime<Utc>,
}

/// `GET /chat/sessions` response payload.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
    pub total: u64,
}

/// One turn in a persisted session history.
///
/// The wire role for assistant turns is `"model"`; ingestion maps it to the
/// internal assistant role.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HistoryMessage {
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// `GET /chat/sessions/{id}` response payload.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SessionHistoryResponse {
    pub session_id: String,
    #[serde(default)]
    pub customer_id: Option<i64>,
    pub messages: Vec<HistoryMessage>,
    pub created_at: DateTime<Utc>,
}

/// `DELETE /chat/sessions/{id}` response payload.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DeleteSessionResponse {
    pub session_id: String,
}

// =============================================================================
// Cart
// =============================================================================

/// `POST /cart/items` request body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: i64,
}

/// `POST /cart/items` response payload.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AddToCartResponse {
    pub order_item_id: String,
    pub order_id: i64,
    pub product_id: i64,
    pub message: String,
}

/// `GET /cart/count` response payload.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct CartCountResponse {
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_data() {
        let body = r#"{
            "status": "success",
            "status_code": 200,
            "message": "Message processed successfully",
            "data": {"count": 3}
        }"#;
        let env: Envelope<CartCountResponse> = serde_json::from_str(body).unwrap();
        assert_eq!(env.status, "success");
        assert_eq!(env.data.unwrap().count, 3);
    }

    #[test]
    fn test_envelope_without_data() {
        let body = r#"{
            "status": "error",
            "status_code": 400,
            "message": "Bad request"
        }"#;
        let env: Envelope<CartCountResponse> = serde_json::from_str(body).unwrap();
        assert_eq!(env.status, "error");
        assert!(env.data.is_none());
    }

    #[test]
    fn test_chat_send_request_omits_absent_session() {
        let req = ChatSendRequest {
            message: "Show me some products".to_string(),
            session_id: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("session_id"));

        let req = ChatSendRequest {
            message: "more".to_string(),
            session_id: Some("s1".to_string()),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"session_id\":\"s1\""));
    }

    #[test]
    fn test_chat_send_response_payload() {
        let body = r#"{
            "session_id": "chatsession_20240131_abc123",
            "response": "Here are some options",
            "products": [{
                "product_id": 7,
                "product_name": "Denim Jacket",
                "product_brand": "BrandName",
                "retail_price": 59.99,
                "department": "Women"
            }],
            "token_usage": {"prompt_tokens": 120, "completion_tokens": 50, "total_tokens": 170},
            "created_at": "2024-01-31T10:00:00Z"
        }"#;
        let resp: ChatSendResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.session_id, "chatsession_20240131_abc123");
        assert_eq!(resp.products.as_ref().unwrap().len(), 1);
        assert_eq!(resp.token_usage.unwrap().total_tokens, 170);
    }

    #[test]
    fn test_chat_send_response_without_products() {
        let body = r#"{
            "session_id": "s1",
            "response": "Hello! How can I help?",
            "created_at": "2024-01-31T10:00:00Z"
        }"#;
        let resp: ChatSendResponse = serde_json::from_str(body).unwrap();
        assert!(resp.products.is_none());
        assert!(resp.token_usage.is_none());
    }

    #[test]
    fn test_session_history_model_role_on_wire() {
        let body = r#"{
            "session_id": "s1",
            "customer_id": 42,
            "messages": [
                {"role": "user", "content": "hi", "created_at": "2024-01-31T10:00:00Z"},
                {"role": "model", "content": "hello!", "created_at": "2024-01-31T10:00:01Z"}
            ],
            "created_at": "2024-01-31T10:00:00Z"
        }"#;
        let resp: SessionHistoryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.messages.len(), 2);
        assert_eq!(resp.messages[1].role, "model");
    }
}
