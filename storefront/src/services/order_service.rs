// storefront/src/services/order_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::errors::Result as AppResult;
use crate::models::{to_document, LineItem, NewOrder, Order, DEFAULT_ORDER_STATUS};
use crate::services::stock::StockAdjuster;
use crate::store::{Collection, Document, DocumentStore, SortOrder, Update};

pub const CREATED_AT_FIELD: &str = "createdAt";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderDocument<'a> {
  customer_name: &'a str,
  customer_phone: &'a str,
  customer_address: &'a str,
  items: &'a [LineItem],
  total: f64,
  status: &'a str,
  created_at: DateTime<Utc>,
}

fn decode_order(doc: Document) -> AppResult<Order> {
  Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Order placement, listing and status changes over the `orders` collection.
#[derive(Clone)]
pub struct OrderService {
  store: Arc<dyn DocumentStore>,
  stock: Arc<dyn StockAdjuster>,
}

impl OrderService {
  pub fn new(store: Arc<dyn DocumentStore>, stock: Arc<dyn StockAdjuster>) -> Self {
    Self { store, stock }
  }

  /// Persists the order exactly as submitted, then adjusts stock for each line item.
  ///
  /// The order write is never rolled back: if the stock step fails the error is
  /// returned even though the order is already stored.
  #[instrument(name = "order_service::create", skip(self, new_order), fields(line_items = new_order.items.len()))]
  pub async fn create_order(&self, new_order: NewOrder) -> AppResult<Order> {
    let status = new_order.status.unwrap_or_else(|| DEFAULT_ORDER_STATUS.to_string());
    let created_at = Utc::now();
    let doc = to_document(&OrderDocument {
      customer_name: &new_order.customer_name,
      customer_phone: &new_order.customer_phone,
      customer_address: &new_order.customer_address,
      items: &new_order.items,
      total: new_order.total,
      status: &status,
      created_at,
    })?;
    let id = self.store.create(Collection::Orders, doc).await?;
    info!("Order {} stored with {} line items.", id, new_order.items.len());

    let order = Order {
      id,
      customer_name: new_order.customer_name,
      customer_phone: new_order.customer_phone,
      customer_address: new_order.customer_address,
      items: new_order.items,
      total: new_order.total,
      status,
      created_at,
    };

    if let Err(e) = self.stock.reserve(&order.items).await {
      error!(order_id = %order.id, error = %e, "Order stored but stock adjustment failed.");
      return Err(e);
    }
    Ok(order)
  }

  /// All orders, newest first.
  #[instrument(name = "order_service::list", skip(self))]
  pub async fn list_orders(&self) -> AppResult<Vec<Order>> {
    let docs = self
      .store
      .find_all(Collection::Orders, SortOrder::NewestFirst(CREATED_AT_FIELD))
      .await?;
    let orders = docs.into_iter().map(decode_order).collect::<AppResult<Vec<_>>>()?;
    info!("Fetched {} orders.", orders.len());
    Ok(orders)
  }

  /// Replaces the status and nothing else. Returns `None` when no order has this id.
  #[instrument(name = "order_service::update_status", skip(self))]
  pub async fn update_order_status(&self, id: &str, status: &str) -> AppResult<Option<Order>> {
    let mut patch = Document::new();
    patch.insert("status".to_string(), Value::String(status.to_string()));
    match self.store.update(Collection::Orders, id, Update::Set(patch)).await? {
      Some(doc) => {
        info!("Order {} moved to status '{}'.", id, status);
        decode_order(doc).map(Some)
      }
      None => {
        warn!("Order {} not found for status update.", id);
        Ok(None)
      }
    }
  }
}
