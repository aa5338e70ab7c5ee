// storefront/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_ORDER_STATUS: &str = "new";

/// Snapshot of a product taken when the order was placed.
///
/// `product_id` is a plain reference; it is not checked against the catalog and
/// later catalog edits never touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LineItem {
  pub product_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub price: Option<f64>,
  pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  #[serde(rename = "_id")]
  pub id: Uuid,
  pub customer_name: String,
  pub customer_phone: String,
  pub customer_address: String,
  pub items: Vec<LineItem>,
  pub total: f64,
  // Free text; no transition rules.
  pub status: String,
  pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/orders`. Items and total are stored as sent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewOrder {
  pub customer_name: String,
  pub customer_phone: String,
  pub customer_address: String,
  pub items: Vec<LineItem>,
  pub total: f64,
  #[serde(default)]
  pub status: Option<String>,
}

/// Body of `PUT /api/orders/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusUpdate {
  pub status: String,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn line_item_needs_only_product_and_quantity() {
    let item: LineItem = serde_json::from_value(json!({ "productId": "p1", "quantity": 3 })).unwrap();
    assert_eq!(item.quantity, 3);
    assert!(item.name.is_none() && item.price.is_none());
  }

  #[test]
  fn new_order_status_is_optional() {
    let order: NewOrder = serde_json::from_value(json!({
      "customerName": "Lina",
      "customerPhone": "0100",
      "customerAddress": "Cairo",
      "items": [],
      "total": 0
    }))
    .unwrap();
    assert!(order.status.is_none());
  }

  #[test]
  fn status_update_rejects_other_fields() {
    assert!(serde_json::from_value::<StatusUpdate>(json!({ "status": "shipped", "total": 1 })).is_err());
    assert!(serde_json::from_value::<StatusUpdate>(json!({})).is_err());
  }
}
