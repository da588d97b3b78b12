//! REST collaborator boundary for the Vitrine storefront client.
//!
//! Defines the [`StorefrontBackend`] trait the conversation and cart engines
//! program against, the wire DTOs for every endpoint, and an HTTP
//! implementation over `reqwest`.

pub mod client;
pub mod error;
pub mod wire;

pub use client::{HttpBackend, StorefrontBackend};
pub use error::BackendError;
pub use wire::{
    AddToCartRequest, AddToCartResponse, CartCountResponse, ChatSendRequest, ChatSendResponse,
    DeleteSessionResponse, Envelope, HistoryMessage, SessionHistoryResponse, SessionListResponse,
};
