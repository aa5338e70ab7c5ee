// storefront/src/store/disconnected.rs

use async_trait::async_trait;
use uuid::Uuid;

use super::{Collection, Document, DocumentStore, SortOrder, StoreError, StoreResult, Update};

/// Stand-in used when no database could be configured at startup.
#[derive(Debug, Clone)]
pub struct DisconnectedStore {
  reason: String,
}

impl DisconnectedStore {
  pub fn new(reason: impl Into<String>) -> Self {
    Self { reason: reason.into() }
  }

  fn unavailable<T>(&self) -> StoreResult<T> {
    Err(StoreError::Unavailable(self.reason.clone()))
  }
}

#[async_trait]
impl DocumentStore for DisconnectedStore {
  async fn create(&self, _collection: Collection, _doc: Document) -> StoreResult<Uuid> {
    self.unavailable()
  }

  async fn find_all(&self, _collection: Collection, _sort: SortOrder) -> StoreResult<Vec<Document>> {
    self.unavailable()
  }

  async fn find_by_id(&self, _collection: Collection, _id: &str) -> StoreResult<Option<Document>> {
    self.unavailable()
  }

  async fn update(&self, _collection: Collection, _id: &str, _update: Update) -> StoreResult<Option<Document>> {
    self.unavailable()
  }

  async fn delete(&self, _collection: Collection, _id: &str) -> StoreResult<bool> {
    self.unavailable()
  }

  async fn aggregate_sum(&self, _collection: Collection, _field: &str) -> StoreResult<f64> {
    self.unavailable()
  }

  async fn count(&self, _collection: Collection) -> StoreResult<u64> {
    self.unavailable()
  }
}
