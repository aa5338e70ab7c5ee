// storefront/src/web/handlers/product_handlers.rs

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::{ApiError, RespondWith};
use crate::models::{NewProduct, ProductPatch};
use crate::state::AppState;

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let products = app_state
    .products
    .list_products()
    .await
    .respond_with(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch products")?;
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
  let product = app_state
    .products
    .get_product(&path)
    .await
    .respond_with(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch product")?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::create_product", skip(app_state, payload))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewProduct>,
) -> Result<HttpResponse, ApiError> {
  let product = app_state
    .products
    .create_product(payload.into_inner())
    .await
    .respond_with(StatusCode::BAD_REQUEST, "Failed to add product")?;
  info!("Product {} added to the catalog.", product.id);
  Ok(HttpResponse::Created().json(product))
}

/// Answers `null` with 200 when the product does not exist.
#[instrument(name = "handler::update_product", skip(app_state, path, payload), fields(product_id = %path.as_ref()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  payload: web::Json<ProductPatch>,
) -> Result<HttpResponse, ApiError> {
  let product = app_state
    .products
    .update_product(&path, payload.into_inner())
    .await
    .respond_with(StatusCode::BAD_REQUEST, "Failed to update product")?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::delete_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
  app_state
    .products
    .delete_product(&path)
    .await
    .respond_with(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete product")?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted successfully" })))
}
