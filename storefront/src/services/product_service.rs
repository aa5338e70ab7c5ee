// storefront/src/services/product_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::errors::{AppError, Result as AppResult};
use crate::models::{to_document, NewProduct, Product, ProductPatch};
use crate::store::{Collection, Document, DocumentStore, SortOrder, Update};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductDocument<'a> {
  #[serde(flatten)]
  fields: &'a NewProduct,
  created_at: DateTime<Utc>,
}

fn decode_product(doc: Document) -> AppResult<Product> {
  Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Catalog CRUD over the `products` collection.
#[derive(Clone)]
pub struct ProductService {
  store: Arc<dyn DocumentStore>,
}

impl ProductService {
  pub fn new(store: Arc<dyn DocumentStore>) -> Self {
    Self { store }
  }

  #[instrument(name = "product_service::list", skip(self))]
  pub async fn list_products(&self) -> AppResult<Vec<Product>> {
    let docs = self.store.find_all(Collection::Products, SortOrder::Natural).await?;
    let products = docs.into_iter().map(decode_product).collect::<AppResult<Vec<_>>>()?;
    info!("Fetched {} products.", products.len());
    Ok(products)
  }

  #[instrument(name = "product_service::get", skip(self))]
  pub async fn get_product(&self, id: &str) -> AppResult<Product> {
    match self.store.find_by_id(Collection::Products, id).await? {
      Some(doc) => decode_product(doc),
      None => {
        warn!("Product {} not found.", id);
        Err(AppError::NotFound("Product not found".to_string()))
      }
    }
  }

  #[instrument(name = "product_service::create", skip(self, new_product), fields(name = %new_product.name))]
  pub async fn create_product(&self, new_product: NewProduct) -> AppResult<Product> {
    let created_at = Utc::now();
    let doc = to_document(&ProductDocument {
      fields: &new_product,
      created_at,
    })?;
    let id = self.store.create(Collection::Products, doc).await?;
    info!("Product {} created.", id);

    Ok(Product {
      id,
      name: new_product.name,
      price: new_product.price,
      description: new_product.description,
      image: new_product.image,
      category: new_product.category,
      stock: new_product.stock,
      created_at,
    })
  }

  /// Returns `None` when no product has this id.
  #[instrument(name = "product_service::update", skip(self, patch))]
  pub async fn update_product(&self, id: &str, patch: ProductPatch) -> AppResult<Option<Product>> {
    let patch = to_document(&patch)?;
    match self.store.update(Collection::Products, id, Update::Set(patch)).await? {
      Some(doc) => {
        info!("Product {} updated.", id);
        decode_product(doc).map(Some)
      }
      None => {
        warn!("Product {} not found for update.", id);
        Ok(None)
      }
    }
  }

  /// Succeeds whether or not the product existed; the flag is only informative.
  #[instrument(name = "product_service::delete", skip(self))]
  pub async fn delete_product(&self, id: &str) -> AppResult<bool> {
    let removed = self.store.delete(Collection::Products, id).await?;
    if removed {
      info!("Product {} deleted.", id);
    } else {
      info!("Product {} was already absent.", id);
    }
    Ok(removed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::MemoryDocumentStore;

  fn service() -> ProductService {
    ProductService::new(Arc::new(MemoryDocumentStore::new()))
  }

  fn pen() -> NewProduct {
    NewProduct {
      name: "Pen".into(),
      price: 2.0,
      description: Some("Blue ink".into()),
      image: None,
      category: Some("stationery".into()),
      stock: 100,
    }
  }

  #[tokio::test]
  async fn created_product_reads_back_identically() {
    let svc = service();
    let created = svc.create_product(pen()).await.unwrap();
    let fetched = svc.get_product(&created.id.to_string()).await.unwrap();
    assert_eq!(created, fetched);
    assert_eq!(fetched.name, "Pen");
    assert_eq!(fetched.stock, 100);
  }

  #[tokio::test]
  async fn update_changes_only_patched_fields() {
    let svc = service();
    let created = svc.create_product(pen()).await.unwrap();
    let id = created.id.to_string();

    let updated = svc
      .update_product(
        &id,
        ProductPatch {
          price: Some(50.0),
          ..Default::default()
        },
      )
      .await
      .unwrap()
      .expect("product exists");

    assert_eq!(updated.price, 50.0);
    assert_eq!(
      Product {
        price: created.price,
        ..updated
      },
      created
    );
  }

  #[tokio::test]
  async fn delete_then_get_is_not_found() {
    let svc = service();
    let id = svc.create_product(pen()).await.unwrap().id.to_string();

    assert!(svc.delete_product(&id).await.unwrap());
    assert!(matches!(svc.get_product(&id).await, Err(AppError::NotFound(_))));
    // Deleting again still succeeds.
    assert!(!svc.delete_product(&id).await.unwrap());
  }

  #[tokio::test]
  async fn malformed_id_is_reported_as_invalid() {
    let svc = service();
    assert!(matches!(svc.get_product("42").await, Err(AppError::InvalidId(_))));
    assert!(matches!(
      svc.update_product("42", ProductPatch::default()).await,
      Err(AppError::InvalidId(_))
    ));
  }
}
