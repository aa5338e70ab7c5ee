// storefront/src/store/memory.rs

//! In-process document store for development (`DATABASE_URL=memory://`) and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use super::{parse_id, with_id, Collection, Document, DocumentStore, SortOrder, StoreError, StoreResult, Update};

pub const MEMORY_URL_SCHEME: &str = "memory:";

#[derive(Debug, Clone)]
struct Entry {
  seq: u64,
  id: Uuid,
  body: Document,
}

#[derive(Debug, Default)]
struct Inner {
  next_seq: u64,
  collections: HashMap<Collection, Vec<Entry>>,
}

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
  inner: RwLock<Inner>,
}

impl MemoryDocumentStore {
  pub fn new() -> Self {
    Self::default()
  }
}

fn timestamp_of(body: &Document, field: &str) -> Option<DateTime<Utc>> {
  body
    .get(field)
    .and_then(Value::as_str)
    .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    .map(|ts| ts.with_timezone(&Utc))
}

fn apply_increment(body: &mut Document, field: &str, by: i64) -> StoreResult<()> {
  let next = match body.get(field) {
    None | Some(Value::Null) => Value::from(by),
    Some(Value::Number(n)) => match n.as_i64() {
      Some(current) => Value::from(current.checked_add(by).ok_or_else(|| {
        StoreError::OutOfRange(format!("'{}' is {} and cannot change by {}", field, current, by))
      })?),
      None => Value::from(n.as_f64().unwrap_or_default() + by as f64),
    },
    Some(other) => {
      return Err(StoreError::Corrupt(format!(
        "cannot increment non-numeric field '{}' (found {})",
        field, other
      )))
    }
  };
  body.insert(field.to_string(), next);
  Ok(())
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
  async fn create(&self, collection: Collection, mut doc: Document) -> StoreResult<Uuid> {
    doc.remove(super::ID_FIELD);
    let id = Uuid::new_v4();
    let mut inner = self.inner.write();
    inner.next_seq += 1;
    let seq = inner.next_seq;
    inner
      .collections
      .entry(collection)
      .or_default()
      .push(Entry { seq, id, body: doc });
    Ok(id)
  }

  async fn find_all(&self, collection: Collection, sort: SortOrder) -> StoreResult<Vec<Document>> {
    let mut entries = {
      let inner = self.inner.read();
      inner.collections.get(&collection).cloned().unwrap_or_default()
    };

    if let SortOrder::NewestFirst(field) = sort {
      entries.sort_by(|a, b| {
        let a_key = (timestamp_of(&a.body, field), a.seq);
        let b_key = (timestamp_of(&b.body, field), b.seq);
        b_key.cmp(&a_key)
      });
    }

    Ok(entries.into_iter().map(|e| with_id(e.id, e.body)).collect())
  }

  async fn find_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
    let id = parse_id(id)?;
    let inner = self.inner.read();
    Ok(
      inner
        .collections
        .get(&collection)
        .and_then(|entries| entries.iter().find(|e| e.id == id))
        .map(|e| with_id(e.id, e.body.clone())),
    )
  }

  async fn update(&self, collection: Collection, id: &str, update: Update) -> StoreResult<Option<Document>> {
    let id = parse_id(id)?;
    let mut inner = self.inner.write();
    let Some(entry) = inner
      .collections
      .get_mut(&collection)
      .and_then(|entries| entries.iter_mut().find(|e| e.id == id))
    else {
      return Ok(None);
    };

    match update {
      Update::Set(patch) => {
        for (key, value) in patch {
          if key != super::ID_FIELD {
            entry.body.insert(key, value);
          }
        }
      }
      Update::Increment { field, by } => apply_increment(&mut entry.body, field, by)?,
    }

    Ok(Some(with_id(entry.id, entry.body.clone())))
  }

  async fn delete(&self, collection: Collection, id: &str) -> StoreResult<bool> {
    let id = parse_id(id)?;
    let mut inner = self.inner.write();
    let Some(entries) = inner.collections.get_mut(&collection) else {
      return Ok(false);
    };
    let before = entries.len();
    entries.retain(|e| e.id != id);
    Ok(entries.len() != before)
  }

  async fn aggregate_sum(&self, collection: Collection, field: &str) -> StoreResult<f64> {
    let inner = self.inner.read();
    Ok(
      inner
        .collections
        .get(&collection)
        .map(|entries| {
          entries
            .iter()
            .filter_map(|e| e.body.get(field).and_then(Value::as_f64))
            .sum::<f64>()
        })
        .unwrap_or(0.0),
    )
  }

  async fn count(&self, collection: Collection) -> StoreResult<u64> {
    let inner = self.inner.read();
    Ok(inner.collections.get(&collection).map_or(0, |entries| entries.len() as u64))
  }
}
