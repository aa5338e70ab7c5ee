// storefront/src/main.rs

use actix_web::HttpServer;
use anyhow::Context;
use storefront::config::AppConfig;
use storefront::state::AppState;
use storefront::{store, telemetry, web};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Configuration comes first so LOG_FORMAT can shape the subscriber.
  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;
  telemetry::init_tracing(app_config.log_format);

  tracing::info!("Starting storefront server...");

  // Never fails: an unreachable database is logged and surfaces per request.
  let document_store = store::connect(&app_config).await;
  let app_state = AppState::new(document_store);

  let server_address = (app_config.server_host.clone(), app_config.server_port);
  tracing::info!("Server listening on http://{}:{}", server_address.0, server_address.1);

  HttpServer::new(move || {
    web::build_app(app_state.clone()).wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
  })
  .bind(server_address)
  .with_context(|| format!("Failed to bind {}:{}", app_config.server_host, app_config.server_port))?
  .run()
  .await?;

  Ok(())
}
