// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every helper

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::sync::Arc;
use storefront::state::AppState;
use storefront::store::{DisconnectedStore, MemoryDocumentStore};
use tracing::Level;

// --- Helper for Tracing Setup ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- State Fixtures ---
pub fn memory_state() -> AppState {
  AppState::new(Arc::new(MemoryDocumentStore::new()))
}

pub fn disconnected_state() -> AppState {
  AppState::new(Arc::new(DisconnectedStore::new("test: no database")))
}

// --- Payload Fixtures ---
pub fn pen_payload() -> Value {
  json!({ "name": "Pen", "price": 2, "stock": 100 })
}

pub fn product_payload(name: &str, stock: i64) -> Value {
  json!({
    "name": name,
    "price": 15.5,
    "description": format!("{} description", name),
    "image": format!("https://cdn.example.com/{}.png", name),
    "category": "general",
    "stock": stock
  })
}

pub fn order_payload(customer: &str, items: Value, total: f64) -> Value {
  json!({
    "customerName": customer,
    "customerPhone": "+20 100 000 0000",
    "customerAddress": "12 Nile St, Cairo",
    "items": items,
    "total": total
  })
}

// --- Request Helpers ---
pub async fn send<S, B>(app: &S, req: actix_http::Request) -> (u16, Value)
where
  S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
  B: MessageBody,
{
  let resp = test::call_service(app, req).await;
  let status = resp.status().as_u16();
  let body = test::read_body(resp).await;
  let value = if body.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
  };
  (status, value)
}

pub async fn create_product<S, B>(app: &S, payload: Value) -> Value
where
  S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
  B: MessageBody,
{
  let req = test::TestRequest::post().uri("/api/products").set_json(payload).to_request();
  let (status, body) = send(app, req).await;
  assert_eq!(status, 201, "product creation failed: {body}");
  body
}

pub async fn fetch_product<S, B>(app: &S, id: &str) -> (u16, Value)
where
  S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
  B: MessageBody,
{
  let req = test::TestRequest::get().uri(&format!("/api/products/{id}")).to_request();
  send(app, req).await
}

pub fn id_of(doc: &Value) -> String {
  doc["_id"].as_str().expect("document has an _id").to_string()
}
