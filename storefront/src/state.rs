// storefront/src/state.rs
use crate::services::{OrderService, ProductService, SequentialDecrement, StatsService, StockAdjuster};
use crate::store::DocumentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub products: ProductService,
  pub orders: OrderService,
  pub stats: StatsService,
}

impl AppState {
  /// Wires every service to `store`, with the default sequential stock decrement.
  pub fn new(store: Arc<dyn DocumentStore>) -> Self {
    let stock = Arc::new(SequentialDecrement::new(store.clone()));
    Self::with_stock_adjuster(store, stock)
  }

  pub fn with_stock_adjuster(store: Arc<dyn DocumentStore>, stock: Arc<dyn StockAdjuster>) -> Self {
    Self {
      products: ProductService::new(store.clone()),
      orders: OrderService::new(store.clone(), stock),
      stats: StatsService::new(store),
    }
  }
}
