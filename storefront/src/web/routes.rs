// storefront/src/web/routes.rs

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpResponse};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::handlers::{order_handlers, product_handlers, stats_handlers};

async fn greeting_handler() -> HttpResponse {
  HttpResponse::Ok()
    .content_type("text/plain; charset=utf-8")
    .body("🚀 Store server is up and running!")
}

/// Turns body parse failures (bad JSON, wrong shape, unknown fields) into 400 `{ "error": ... }`.
pub fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| {
    warn!(error = %err, "Rejected request body.");
    AppError::Validation(format!("Invalid request body: {}", err)).into()
  })
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.route("/", web::get().to(greeting_handler)).service(
    web::scope("/api")
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("", web::post().to(product_handlers::create_product_handler))
          .route("/{id}", web::get().to(product_handlers::get_product_handler))
          .route("/{id}", web::put().to(product_handlers::update_product_handler))
          .route("/{id}", web::delete().to(product_handlers::delete_product_handler)),
      )
      .service(
        web::scope("/orders")
          .route("", web::post().to(order_handlers::create_order_handler))
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/{id}", web::put().to(order_handlers::update_order_status_handler)),
      )
      .route("/stats", web::get().to(stats_handlers::get_stats_handler)),
  );
}

/// The application as served by the binary and exercised by the integration tests.
pub fn build_app(
  app_state: AppState,
) -> App<
  impl ServiceFactory<
    ServiceRequest,
    Config = (),
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
    InitError = (),
  >,
> {
  App::new()
    .app_data(web::Data::new(app_state))
    .app_data(json_config())
    .wrap(Cors::permissive())
    .configure(configure_app_routes)
}
