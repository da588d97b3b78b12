//! Cart-side stock reconciliation for Vitrine.
//!
//! Keeps the shopper's cart honest against live inventory: per-product
//! stock snapshots, unit-line quantity math, and the checkout gate.

pub mod stock;

pub use stock::StockReconciler;
