// storefront/src/store/conformance.rs

//! Behaviour every [`DocumentStore`] backend must share. Each backend's test
//! module runs these against its own instance.

use serde_json::{json, Value};
use uuid::Uuid;

use super::{Collection, Document, DocumentStore, SortOrder, StoreError, Update};

fn doc(value: Value) -> Document {
  match value {
    Value::Object(map) => map,
    other => panic!("expected a JSON object, got {other}"),
  }
}

pub async fn create_then_find_exposes_assigned_id(store: &dyn DocumentStore) {
  let id = store
    .create(Collection::Products, doc(json!({ "name": "Pen", "stock": 100 })))
    .await
    .unwrap();

  let found = store
    .find_by_id(Collection::Products, &id.to_string())
    .await
    .unwrap()
    .expect("document should exist");
  assert_eq!(found.get("_id"), Some(&json!(id.to_string())));
  assert_eq!(found.get("name"), Some(&json!("Pen")));

  // Collections are independent.
  assert!(store
    .find_by_id(Collection::Orders, &id.to_string())
    .await
    .unwrap()
    .is_none());
}

pub async fn malformed_id_is_distinct_from_absent(store: &dyn DocumentStore) {
  let err = store.find_by_id(Collection::Products, "not-an-id").await.unwrap_err();
  assert!(matches!(err, StoreError::InvalidId(ref raw) if raw == "not-an-id"));

  let absent = store
    .find_by_id(Collection::Products, &Uuid::new_v4().to_string())
    .await
    .unwrap();
  assert!(absent.is_none());

  assert!(matches!(
    store.delete(Collection::Products, "nope").await,
    Err(StoreError::InvalidId(_))
  ));
}

pub async fn set_merges_only_given_fields(store: &dyn DocumentStore) {
  let id = store
    .create(Collection::Products, doc(json!({ "name": "Pen", "price": 2, "stock": 100 })))
    .await
    .unwrap();

  let updated = store
    .update(
      Collection::Products,
      &id.to_string(),
      Update::Set(doc(json!({ "price": 50, "_id": "ignored" }))),
    )
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.get("price"), Some(&json!(50)));
  assert_eq!(updated.get("name"), Some(&json!("Pen")));
  assert_eq!(updated.get("stock"), Some(&json!(100)));
  assert_eq!(updated.get("_id"), Some(&json!(id.to_string())));
}

pub async fn increment_allows_negative_results_and_missing_fields(store: &dyn DocumentStore) {
  let id = store
    .create(Collection::Products, doc(json!({ "stock": 2 })))
    .await
    .unwrap()
    .to_string();

  let after = store
    .update(Collection::Products, &id, Update::Increment { field: "stock", by: -5 })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(after.get("stock"), Some(&json!(-3)));

  let bare = store
    .create(Collection::Products, doc(json!({ "name": "no stock" })))
    .await
    .unwrap()
    .to_string();
  let after = store
    .update(Collection::Products, &bare, Update::Increment { field: "stock", by: -1 })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(after.get("stock"), Some(&json!(-1)));
}

pub async fn increment_past_i64_bounds_is_rejected(store: &dyn DocumentStore) {
  for (start, by) in [(i64::MAX, 1), (i64::MIN, -1)] {
    let id = store
      .create(Collection::Products, doc(json!({ "stock": start })))
      .await
      .unwrap()
      .to_string();

    let err = store
      .update(Collection::Products, &id, Update::Increment { field: "stock", by })
      .await
      .unwrap_err();
    assert!(matches!(err, StoreError::OutOfRange(_)), "got {err:?}");

    let unchanged = store.find_by_id(Collection::Products, &id).await.unwrap().unwrap();
    assert_eq!(unchanged.get("stock"), Some(&json!(start)));
  }
}

pub async fn increment_on_absent_document_is_none(store: &dyn DocumentStore) {
  let result = store
    .update(
      Collection::Products,
      &Uuid::new_v4().to_string(),
      Update::Increment { field: "stock", by: -1 },
    )
    .await
    .unwrap();
  assert!(result.is_none());
}

pub async fn newest_first_orders_by_timestamp_then_insertion(store: &dyn DocumentStore) {
  for (n, created_at) in [
    (1, "2024-01-01T10:00:00Z"),
    (2, "2024-01-02T10:00:00.5Z"),
    (3, "2024-01-02T10:00:00.5Z"),
  ] {
    store
      .create(Collection::Orders, doc(json!({ "n": n, "createdAt": created_at })))
      .await
      .unwrap();
  }

  let sorted = store
    .find_all(Collection::Orders, SortOrder::NewestFirst("createdAt"))
    .await
    .unwrap();
  let order: Vec<_> = sorted.iter().map(|d| d.get("n").cloned().unwrap()).collect();
  assert_eq!(order, vec![json!(3), json!(2), json!(1)]);
}

pub async fn sum_and_count_default_to_zero(store: &dyn DocumentStore) {
  assert_eq!(store.count(Collection::Orders).await.unwrap(), 0);
  assert_eq!(store.aggregate_sum(Collection::Orders, "total").await.unwrap(), 0.0);

  for total in [json!(10.5), json!("not a number"), json!(4)] {
    store
      .create(Collection::Orders, doc(json!({ "total": total })))
      .await
      .unwrap();
  }

  assert_eq!(store.count(Collection::Orders).await.unwrap(), 3);
  assert_eq!(store.aggregate_sum(Collection::Orders, "total").await.unwrap(), 14.5);
}

pub async fn delete_reports_whether_anything_was_removed(store: &dyn DocumentStore) {
  let id = store
    .create(Collection::Products, doc(json!({ "name": "Pen" })))
    .await
    .unwrap()
    .to_string();

  assert!(store.delete(Collection::Products, &id).await.unwrap());
  assert!(!store.delete(Collection::Products, &id).await.unwrap());
  assert_eq!(store.count(Collection::Products).await.unwrap(), 0);
}
