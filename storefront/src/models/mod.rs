// storefront/src/models/mod.rs

//! Entities stored in the document store and the request payloads that create or change them.

pub mod order;
pub mod product;
pub mod stats;

pub use order::{LineItem, NewOrder, Order, StatusUpdate, DEFAULT_ORDER_STATUS};
pub use product::{NewProduct, Product, ProductPatch};
pub use stats::Stats;

use serde::Serialize;
use serde_json::Value;

use crate::errors::{AppError, Result};
use crate::store::Document;

/// Serializes a request payload into a storable document.
pub(crate) fn to_document<T: Serialize>(value: &T) -> Result<Document> {
  match serde_json::to_value(value)? {
    Value::Object(map) => Ok(map),
    other => Err(AppError::Internal(format!("expected a JSON object, got {}", other))),
  }
}
