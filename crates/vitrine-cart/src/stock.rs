//! Cart stock reconciliation.
//!
//! The cart stores one line per unit, so a product's quantity is the number
//! of lines carrying its id. The reconciler keeps per-product stock
//! snapshots fetched from the backend and answers whether each line is
//! actually fulfillable, gating checkout until at least one full check has
//! completed against the current cart contents.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinSet;
use tracing::warn;

use vitrine_backend::StorefrontBackend;
use vitrine_core::{CartItemLine, ProductStock, Result, StockStatus, VitrineError};

#[derive(Default)]
struct StockState {
    cart_lines: Vec<CartItemLine>,
    snapshots: HashMap<i64, ProductStock>,
    checked_once: bool,
    refreshing: bool,
}

/// Reconciles cart contents against live per-product stock.
pub struct StockReconciler {
    backend: Arc<dyn StorefrontBackend>,
    state: Mutex<StockState>,
}

impl StockReconciler {
    pub fn new(backend: Arc<dyn StorefrontBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(StockState::default()),
        }
    }

    /// Pull the current cart from the backend and reconcile it: line
    /// replacement followed by a full snapshot refresh.
    pub async fn sync_cart(&self) -> Result<()> {
        let cart = self.backend.cart().await.map_err(VitrineError::from)?;
        self.set_cart_lines(cart.items)?;
        self.refresh().await
    }

    /// Replace the cart contents the reconciler reasons about.
    ///
    /// Existing snapshots are kept for display, but the cart is considered
    /// unchecked again until the next [`refresh`](Self::refresh) completes.
    pub fn set_cart_lines(&self, lines: Vec<CartItemLine>) -> Result<()> {
        let mut state = self.state()?;
        state.cart_lines = lines;
        state.checked_once = false;
        Ok(())
    }

    /// Fetch fresh stock snapshots for every distinct product in the cart.
    ///
    /// Lookups run concurrently. A failed lookup is logged and leaves any
    /// prior snapshot for that product in place; the check still counts as
    /// completed.
    pub async fn refresh(&self) -> Result<()> {
        let product_ids: Vec<i64> = {
            let mut state = self.state()?;
            state.refreshing = true;
            distinct_product_ids(&state.cart_lines)
        };

        let mut tasks = JoinSet::new();
        for product_id in product_ids {
            let backend = Arc::clone(&self.backend);
            tasks.spawn(async move { (product_id, backend.product_stock(product_id).await) });
        }

        let mut fetched = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(stock))) => fetched.push(stock),
                Ok((product_id, Err(e))) => {
                    warn!("Stock lookup failed for product {product_id}: {e}");
                }
                Err(e) => warn!("Stock lookup task panicked: {e}"),
            }
        }

        let mut state = self.state()?;
        for stock in fetched {
            state.snapshots.insert(stock.product_id, stock);
        }
        state.checked_once = true;
        state.refreshing = false;
        Ok(())
    }

    /// The distinct product ids currently in the cart, ascending.
    pub fn cart_product_ids(&self) -> Vec<i64> {
        self.state
            .lock()
            .map(|s| distinct_product_ids(&s.cart_lines))
            .unwrap_or_default()
    }

    /// Units of `product_id` in the cart.
    pub fn quantity(&self, product_id: i64) -> u64 {
        self.state
            .lock()
            .map(|s| {
                s.cart_lines
                    .iter()
                    .filter(|l| l.product_id == product_id)
                    .count() as u64
            })
            .unwrap_or(0)
    }

    /// The most recent stock snapshot for a product, possibly stale.
    pub fn snapshot(&self, product_id: i64) -> Option<ProductStock> {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.snapshots.get(&product_id).cloned())
    }

    /// Whether the cart holds more of `product_id` than is available.
    ///
    /// Untracked products never have an issue, and so does a product with no
    /// snapshot yet (unknown availability fails open).
    pub fn has_stock_issue(&self, product_id: i64) -> bool {
        let quantity = self.quantity(product_id);
        match self.snapshot(product_id) {
            Some(stock) => stock.is_track_stock && stock.available_quantity < quantity as i64,
            None => false,
        }
    }

    /// Short shopper-facing description of a product's stock problem, if any.
    pub fn stock_issue_message(&self, product_id: i64) -> Option<String> {
        let stock = self.snapshot(product_id)?;
        if !stock.is_track_stock {
            return None;
        }
        if stock.stock_status == StockStatus::OutOfStock {
            return Some("Out of stock".to_string());
        }
        if stock.available_quantity < self.quantity(product_id) as i64 {
            return Some(format!("Only {} available", stock.available_quantity));
        }
        None
    }

    /// Whether checkout may proceed: at least one full check has completed
    /// against the current cart, no refresh is in flight, and no line has a
    /// stock issue.
    pub fn checkout_allowed(&self) -> bool {
        let (checked, refreshing, product_ids) = match self.state.lock() {
            Ok(state) => (
                state.checked_once,
                state.refreshing,
                distinct_product_ids(&state.cart_lines),
            ),
            Err(_) => return false,
        };
        checked && !refreshing && product_ids.iter().all(|&id| !self.has_stock_issue(id))
    }

    /// Whether a refresh is currently in flight.
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().map(|s| s.refreshing).unwrap_or(false)
    }

    /// Whether any full check has completed since the cart last changed.
    pub fn has_checked(&self) -> bool {
        self.state.lock().map(|s| s.checked_once).unwrap_or(false)
    }

    fn state(&self) -> Result<MutexGuard<'_, StockState>> {
        self.state
            .lock()
            .map_err(|e| VitrineError::Cart(format!("Stock state lock poisoned: {e}")))
    }
}

fn distinct_product_ids(lines: &[CartItemLine]) -> Vec<i64> {
    let mut ids: Vec<i64> = lines.iter().map(|l| l.product_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

// =============================================================================
// Tests
// =============================================================================
