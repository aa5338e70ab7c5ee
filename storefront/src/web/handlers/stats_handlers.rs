// storefront/src/web/handlers/stats_handlers.rs

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::errors::{ApiError, RespondWith};
use crate::state::AppState;

#[instrument(name = "handler::get_stats", skip(app_state))]
pub async fn get_stats_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
  let stats = app_state
    .stats
    .get_stats()
    .await
    .respond_with(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch statistics")?;
  Ok(HttpResponse::Ok().json(stats))
}
