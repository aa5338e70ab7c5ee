// storefront/src/services/stock.rs

//! Stock side effect of placing an order.
//!
//! `OrderService` only talks to [`StockAdjuster`], so the decrement strategy can
//! be replaced (for example by a transactional or compare-and-set version)
//! without touching order placement itself.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::errors::{AppError, Result as AppResult};
use crate::models::LineItem;
use crate::store::{Collection, DocumentStore, Update};

pub const STOCK_FIELD: &str = "stock";

#[async_trait]
pub trait StockAdjuster: Send + Sync {
  /// Removes the ordered quantities from the catalog.
  async fn reserve(&self, items: &[LineItem]) -> AppResult<()>;
}

/// One `$inc`-style update per line item, in payload order.
///
/// Not atomic: each decrement is its own write, concurrent orders can
/// interleave, and stock may go negative. The first failing item stops the
/// loop; items before it stay applied and items after it are never attempted.
/// Line items pointing at products that no longer exist are skipped.
#[derive(Clone)]
pub struct SequentialDecrement {
  store: Arc<dyn DocumentStore>,
}

impl SequentialDecrement {
  pub fn new(store: Arc<dyn DocumentStore>) -> Self {
    Self { store }
  }
}

#[async_trait]
impl StockAdjuster for SequentialDecrement {
  #[instrument(name = "stock::sequential_decrement", skip(self, items), fields(line_items = items.len()))]
  async fn reserve(&self, items: &[LineItem]) -> AppResult<()> {
    for (position, item) in items.iter().enumerate() {
      let decrement = item
        .quantity
        .checked_neg()
        .ok_or_else(|| AppError::Validation(format!("Quantity {} is out of range", item.quantity)));
      let outcome = match decrement {
        Ok(by) => {
          let update = Update::Increment { field: STOCK_FIELD, by };
          self
            .store
            .update(Collection::Products, &item.product_id, update)
            .await
            .map_err(AppError::from)
        }
        Err(e) => Err(e),
      };
      match outcome {
        Ok(Some(_)) => info!(product_id = %item.product_id, quantity = item.quantity, "Stock decremented."),
        Ok(None) => warn!(product_id = %item.product_id, "Line item references a missing product; stock left as is."),
        Err(e) => {
          warn!(
            product_id = %item.product_id,
            position,
            remaining = items.len() - position - 1,
            error = %e,
            "Stock decrement failed; skipping the remaining line items."
          );
          return Err(e);
        }
      }
    }
    Ok(())
  }
}
