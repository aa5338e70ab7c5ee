// storefront/src/store/mod.rs

//! Document persistence for the storefront.
//!
//! Products and orders are kept as schema-less JSON objects in two
//! collections. Every backend implements [`DocumentStore`]; services only ever
//! see an `Arc<dyn DocumentStore>` handed to them at construction time.

#[cfg(test)]
pub(crate) mod conformance;
pub mod disconnected;
pub mod memory;
pub mod postgres;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;

pub use disconnected::DisconnectedStore;
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// A stored JSON object. The `_id` key is owned by the store.
pub type Document = Map<String, Value>;

/// Key under which every document exposes its identifier.
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Storage backend unavailable: {0}")]
  Unavailable(String),

  #[error("Malformed document id '{0}'")]
  InvalidId(String),

  #[error("Database Error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Stored document is corrupt: {0}")]
  Corrupt(String),

  // An increment whose result does not fit a 64-bit integer.
  #[error("Value out of range: {0}")]
  OutOfRange(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
  Products,
  Orders,
}

impl Collection {
  pub fn as_str(&self) -> &'static str {
    match self {
      Collection::Products => "products",
      Collection::Orders => "orders",
    }
  }
}

impl fmt::Display for Collection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Ordering applied by [`DocumentStore::find_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
  /// Insertion order.
  #[default]
  Natural,
  /// Descending by an RFC 3339 timestamp field; ties fall back to the most recent insert.
  NewestFirst(&'static str),
}

/// A mutation applied by [`DocumentStore::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
  /// Shallow merge: every key of the patch replaces the stored value.
  Set(Document),
  /// Adds `by` to a numeric field. A missing field is treated as 0. A result
  /// outside the `i64` range fails with [`StoreError::OutOfRange`] and leaves
  /// the document untouched.
  Increment { field: &'static str, by: i64 },
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
  /// Persists `doc` and returns the id assigned to it.
  async fn create(&self, collection: Collection, doc: Document) -> StoreResult<Uuid>;

  async fn find_all(&self, collection: Collection, sort: SortOrder) -> StoreResult<Vec<Document>>;

  /// `Ok(None)` when no document has this id; `Err(InvalidId)` when `id` is not a valid id at all.
  async fn find_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>>;

  /// Applies `update` and returns the document as it is afterwards.
  async fn update(&self, collection: Collection, id: &str, update: Update) -> StoreResult<Option<Document>>;

  /// Returns whether a document was actually removed.
  async fn delete(&self, collection: Collection, id: &str) -> StoreResult<bool>;

  /// Sum of `field` over all documents, skipping non-numeric values. 0 when the collection is empty.
  async fn aggregate_sum(&self, collection: Collection, field: &str) -> StoreResult<f64>;

  async fn count(&self, collection: Collection) -> StoreResult<u64>;
}

pub fn parse_id(id: &str) -> StoreResult<Uuid> {
  Uuid::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// Returns the stored body with its id exposed under [`ID_FIELD`].
pub(crate) fn with_id(id: Uuid, mut body: Document) -> Document {
  body.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
  body
}

/// Selects and initializes the backend named by `DATABASE_URL`.
///
/// A failed connection is logged and never aborts startup; requests then fail
/// with storage errors until the database becomes reachable.
pub async fn connect(config: &AppConfig) -> Arc<dyn DocumentStore> {
  let Some(url) = config.database_url.as_deref() else {
    error!("DATABASE_URL is not set. Every request will fail with a storage error.");
    return Arc::new(DisconnectedStore::new("DATABASE_URL is not set"));
  };

  if url.starts_with(memory::MEMORY_URL_SCHEME) {
    warn!("Using the in-memory document store. Data is lost on restart.");
    return Arc::new(MemoryDocumentStore::new());
  }

  let store = match PgDocumentStore::connect_lazy(url, config.db_max_connections, config.db_acquire_timeout) {
    Ok(store) => store,
    Err(e) => {
      error!(error = %e, "Failed to configure the database connection.");
      return Arc::new(DisconnectedStore::new(e.to_string()));
    }
  };

  match store.ping().await {
    Ok(()) => info!("Successfully connected to the database."),
    Err(e) => error!(error = %e, "Failed to connect to the database."),
  }
  Arc::new(store)
}
