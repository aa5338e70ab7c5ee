// storefront/src/store/postgres.rs

//! Postgres-backed document store.
//!
//! Every collection shares one `documents` table and each document body is a
//! JSONB object. Ids are UUIDs kept outside the body and re-attached as `_id`
//! on every read.
//!
//! The pool connects lazily, so a database that is down at startup only
//! surfaces as `StoreError::Database` on the requests that need it. The table
//! is created on the first call that reaches the database.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::{parse_id, with_id, Collection, Document, DocumentStore, SortOrder, StoreError, StoreResult, Update};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
  seq BIGSERIAL PRIMARY KEY,
  collection TEXT NOT NULL,
  id UUID NOT NULL UNIQUE,
  body JSONB NOT NULL
)
"#;

const CREATE_INDEX: &str = "CREATE INDEX IF NOT EXISTS documents_collection_idx ON documents (collection)";

#[derive(Debug)]
pub struct PgDocumentStore {
  pool: PgPool,
  schema_ready: OnceCell<()>,
}

impl PgDocumentStore {
  /// Builds the pool without opening a connection. Fails only when `url` cannot be parsed.
  pub fn connect_lazy(url: &str, max_connections: u32, acquire_timeout: Duration) -> StoreResult<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .acquire_timeout(acquire_timeout)
      .connect_lazy(url)?;
    Ok(Self::from_pool(pool))
  }

  pub fn from_pool(pool: PgPool) -> Self {
    Self {
      pool,
      schema_ready: OnceCell::new(),
    }
  }

  /// Round-trips to the database and makes sure the schema exists.
  pub async fn ping(&self) -> StoreResult<()> {
    self.ready().await
  }

  async fn ready(&self) -> StoreResult<()> {
    self
      .schema_ready
      .get_or_try_init(|| async {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_INDEX).execute(&self.pool).await?;
        debug!("documents table is ready");
        Ok::<(), StoreError>(())
      })
      .await?;
    Ok(())
  }
}

fn document_from_row(row: &PgRow) -> StoreResult<Document> {
  let id: Uuid = row.try_get("id")?;
  match row.try_get::<Value, _>("body")? {
    Value::Object(body) => Ok(with_id(id, body)),
    other => Err(StoreError::Corrupt(format!("document {} has a non-object body: {}", id, other))),
  }
}

// SQLSTATE numeric_value_out_of_range, raised by the `::bigint` cast.
const NUMERIC_OUT_OF_RANGE: &str = "22003";

fn increment_error(err: sqlx::Error, field: &str, by: i64) -> StoreError {
  let out_of_range = err
    .as_database_error()
    .and_then(|db| db.code())
    .is_some_and(|code| code == NUMERIC_OUT_OF_RANGE);
  if out_of_range {
    StoreError::OutOfRange(format!("'{}' cannot change by {}", field, by))
  } else {
    StoreError::Database(err)
  }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
  #[instrument(name = "store::create", skip(self, doc), err)]
  async fn create(&self, collection: Collection, mut doc: Document) -> StoreResult<Uuid> {
    self.ready().await?;
    doc.remove(super::ID_FIELD);
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
      .bind(collection.as_str())
      .bind(id)
      .bind(Value::Object(doc))
      .execute(&self.pool)
      .await?;
    Ok(id)
  }

  #[instrument(name = "store::find_all", skip(self), err)]
  async fn find_all(&self, collection: Collection, sort: SortOrder) -> StoreResult<Vec<Document>> {
    self.ready().await?;
    let rows = match sort {
      SortOrder::Natural => {
        sqlx::query("SELECT id, body FROM documents WHERE collection = $1 ORDER BY seq")
          .bind(collection.as_str())
          .fetch_all(&self.pool)
          .await?
      }
      SortOrder::NewestFirst(field) => {
        sqlx::query(
          "SELECT id, body FROM documents WHERE collection = $1 \
           ORDER BY (body->>$2::text)::timestamptz DESC NULLS LAST, seq DESC",
        )
        .bind(collection.as_str())
        .bind(field)
        .fetch_all(&self.pool)
        .await?
      }
    };
    rows.iter().map(document_from_row).collect()
  }

  #[instrument(name = "store::find_by_id", skip(self), err)]
  async fn find_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
    let id = parse_id(id)?;
    self.ready().await?;
    let row = sqlx::query("SELECT id, body FROM documents WHERE collection = $1 AND id = $2")
      .bind(collection.as_str())
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    row.as_ref().map(document_from_row).transpose()
  }

  #[instrument(name = "store::update", skip(self, update), err)]
  async fn update(&self, collection: Collection, id: &str, update: Update) -> StoreResult<Option<Document>> {
    let id = parse_id(id)?;
    self.ready().await?;
    let row = match update {
      Update::Set(mut patch) => {
        patch.remove(super::ID_FIELD);
        sqlx::query(
          "UPDATE documents SET body = body || $3 \
           WHERE collection = $1 AND id = $2 RETURNING id, body",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Value::Object(patch))
        .fetch_optional(&self.pool)
        .await?
      }
      Update::Increment { field, by } => {
        sqlx::query(
          "UPDATE documents \
           SET body = jsonb_set(body, ARRAY[$3::text], to_jsonb((COALESCE((body->>$3::text)::numeric, 0) + $4)::bigint)) \
           WHERE collection = $1 AND id = $2 RETURNING id, body",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(field)
        .bind(by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| increment_error(e, field, by))?
      }
    };
    row.as_ref().map(document_from_row).transpose()
  }

  #[instrument(name = "store::delete", skip(self), err)]
  async fn delete(&self, collection: Collection, id: &str) -> StoreResult<bool> {
    let id = parse_id(id)?;
    self.ready().await?;
    let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
      .bind(collection.as_str())
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "store::aggregate_sum", skip(self), err)]
  async fn aggregate_sum(&self, collection: Collection, field: &str) -> StoreResult<f64> {
    self.ready().await?;
    let total: f64 = sqlx::query_scalar(
      "SELECT COALESCE(SUM(CASE WHEN jsonb_typeof(body->$2::text) = 'number' \
       THEN (body->>$2::text)::float8 END), 0)::float8 \
       FROM documents WHERE collection = $1",
    )
    .bind(collection.as_str())
    .bind(field)
    .fetch_one(&self.pool)
    .await?;
    Ok(total)
  }

  #[instrument(name = "store::count", skip(self), err)]
  async fn count(&self, collection: Collection) -> StoreResult<u64> {
    self.ready().await?;
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = $1")
      .bind(collection.as_str())
      .fetch_one(&self.pool)
      .await?;
    Ok(count.max(0) as u64)
  }
}
