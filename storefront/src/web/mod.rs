// storefront/src/web/mod.rs

pub mod handlers;
pub mod routes;

pub use routes::{build_app, configure_app_routes, json_config};
