// storefront/src/web/handlers/order_handlers.rs

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use tracing::{info, instrument};

use crate::errors::{ApiError, RespondWith};
use crate::models::{NewOrder, StatusUpdate};
use crate::state::AppState;

// Any failure, including one from the stock step after the order was stored,
// is answered the same way.
#[instrument(name = "handler::create_order", skip(app_state, payload))]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewOrder>,
) -> Result<HttpResponse, ApiError> {
  let order = app_state
    .orders
    .create_order(payload.into_inner())
    .await
    .respond_with(StatusCode::BAD_REQUEST, "Failed to create order")?;
  info!("Order {} placed.", order.id);
  Ok(HttpResponse::Created().json(order))
}

#[instrument(name = "handler::list_orders", skip(app_state))]
pub async fn list_orders_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let orders = app_state
    .orders
    .list_orders()
    .await
    .respond_with(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch orders")?;
  Ok(HttpResponse::Ok().json(orders))
}

/// Answers `null` with 200 when the order does not exist.
#[instrument(name = "handler::update_order_status", skip(app_state, path, payload), fields(order_id = %path.as_ref()))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  payload: web::Json<StatusUpdate>,
) -> Result<HttpResponse, ApiError> {
  let order = app_state
    .orders
    .update_order_status(&path, &payload.status)
    .await
    .respond_with(StatusCode::BAD_REQUEST, "Failed to update order")?;
  Ok(HttpResponse::Ok().json(order))
}
