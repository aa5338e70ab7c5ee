// storefront/src/services/stats_service.rs

use std::sync::Arc;

use tracing::instrument;

use crate::errors::Result as AppResult;
use crate::models::Stats;
use crate::store::{Collection, DocumentStore};

pub const TOTAL_FIELD: &str = "total";

/// Dashboard figures, recomputed on every call.
#[derive(Clone)]
pub struct StatsService {
  store: Arc<dyn DocumentStore>,
}

impl StatsService {
  pub fn new(store: Arc<dyn DocumentStore>) -> Self {
    Self { store }
  }

  #[instrument(name = "stats_service::get", skip(self))]
  pub async fn get_stats(&self) -> AppResult<Stats> {
    let total_products = self.store.count(Collection::Products).await?;
    let total_orders = self.store.count(Collection::Orders).await?;
    let total_revenue = self.store.aggregate_sum(Collection::Orders, TOTAL_FIELD).await?;
    Ok(Stats {
      total_products,
      total_orders,
      total_revenue,
    })
  }
}
