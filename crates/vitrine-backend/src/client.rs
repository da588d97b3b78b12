//! Storefront backend trait and its HTTP implementation.
//!
//! The engines program against [`StorefrontBackend`] so tests can substitute
//! an in-memory double; [`HttpBackend`] is the production implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use vitrine_core::config::BackendConfig;
use vitrine_core::{CartSummary, ProductStock};

use crate::error::BackendError;
use crate::wire::{
    AddToCartRequest, AddToCartResponse, CartCountResponse, ChatSendRequest, ChatSendResponse,
    DeleteSessionResponse, Envelope, SessionHistoryResponse, SessionListResponse,
};

/// The remote storefront service as seen by the conversation and cart engines.
///
/// No method retries on failure; retry is an explicit, user-visible action
/// owned by the orchestrator.
#[async_trait]
pub trait StorefrontBackend: Send + Sync {
    /// Send one user message to the assistant, continuing `session_id` if given.
    async fn send_chat(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatSendResponse, BackendError>;

    /// List the customer's most recent chat sessions.
    async fn list_sessions(&self, limit: u32) -> Result<SessionListResponse, BackendError>;

    /// Fetch the full message history of one session.
    async fn session_history(
        &self,
        session_id: &str,
    ) -> Result<SessionHistoryResponse, BackendError>;

    /// Delete a session server-side.
    async fn delete_session(
        &self,
        session_id: &str,
    ) -> Result<DeleteSessionResponse, BackendError>;

    /// Add one unit of a product to the cart.
    async fn add_to_cart(&self, product_id: i64) -> Result<AddToCartResponse, BackendError>;

    /// The current cart with its lines and totals.
    async fn cart(&self) -> Result<CartSummary, BackendError>;

    /// Number of items currently in the cart.
    async fn cart_count(&self) -> Result<u64, BackendError>;

    /// Stock snapshot for one product.
    async fn product_stock(&self, product_id: i64) -> Result<ProductStock, BackendError>;

    /// Whether calls carry customer credentials.
    fn is_authenticated(&self) -> bool;
}

/// `reqwest`-based implementation of [`StorefrontBackend`].
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpBackend {
    /// Build a client from configuration.
    ///
    /// The configured request timeout applies to every call; without it a
    /// hung request would leave the conversation's loading flag stuck.
    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send a request and unwrap the standard response envelope.
    async fn execute<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let resp = self.authorize(req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            // Error bodies use the same envelope; fall back to the HTTP
            // status line when the body isn't parseable.
            let message = match resp.json::<Envelope<serde_json::Value>>().await {
                Ok(env) => env.message,
                Err(_) => status.to_string(),
            };
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let env: Envelope<T> = resp.json().await?;
        env.data.ok_or(BackendError::MissingData)
    }
}

#[async_trait]
impl StorefrontBackend for HttpBackend {
    async fn send_chat(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatSendResponse, BackendError> {
        debug!(session_id = ?session_id, "Sending chat message");
        let body = ChatSendRequest {
            message: message.to_string(),
            session_id: session_id.map(str::to_string),
        };
        self.execute(self.client.post(self.endpoint("chat")).json(&body))
            .await
    }

    async fn list_sessions(&self, limit: u32) -> Result<SessionListResponse, BackendError> {
        self.execute(
            self.client
                .get(self.endpoint("chat/sessions"))
                .query(&[("limit", limit)]),
        )
        .await
    }

    async fn session_history(
        &self,
        session_id: &str,
    ) -> Result<SessionHistoryResponse, BackendError> {
        self.execute(
            self.client
                .get(self.endpoint(&format!("chat/sessions/{session_id}"))),
        )
        .await
    }

    async fn delete_session(
        &self,
        session_id: &str,
    ) -> Result<DeleteSessionResponse, BackendError> {
        self.execute(
            self.client
                .delete(self.endpoint(&format!("chat/sessions/{session_id}"))),
        )
        .await
    }

    async fn add_to_cart(&self, product_id: i64) -> Result<AddToCartResponse, BackendError> {
        let body = AddToCartRequest { product_id };
        self.execute(self.client.post(self.endpoint("cart/items")).json(&body))
            .await
    }

    async fn cart(&self) -> Result<CartSummary, BackendError> {
        self.execute(self.client.get(self.endpoint("cart"))).await
    }

    async fn cart_count(&self) -> Result<u64, BackendError> {
        let resp: CartCountResponse = self
            .execute(self.client.get(self.endpoint("cart/count")))
            .await?;
        Ok(resp.count)
    }

    async fn product_stock(&self, product_id: i64) -> Result<ProductStock, BackendError> {
        self.execute(
            self.client
                .get(self.endpoint(&format!("stock/{product_id}"))),
        )
        .await
    }

    fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }
}
