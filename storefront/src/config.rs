// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
  #[default]
  Pretty,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  // None means the process starts but every request fails with a storage error.
  pub database_url: Option<String>,
  pub db_max_connections: u32,
  pub db_acquire_timeout: Duration,
  pub log_format: LogFormat,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "0.0.0.0".to_string(),
      server_port: 3000,
      database_url: None,
      db_max_connections: 10,
      db_acquire_timeout: Duration::from_secs(5),
      log_format: LogFormat::Pretty,
    }
  }
}

impl AppConfig {
  /// Reads the process environment once, after loading `.env` if present.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from an arbitrary variable source.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let defaults = Self::default();

    let parse = |name: &str, raw: String| -> Result<u64> {
      raw
        .trim()
        .parse::<u64>()
        .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e)))
    };

    let server_host = lookup("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = match lookup("PORT") {
      Some(raw) => u16::try_from(parse("PORT", raw)?)
        .map_err(|e| AppError::Config(format!("Invalid PORT: {}", e)))?,
      None => defaults.server_port,
    };
    let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
    let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
      Some(raw) => u32::try_from(parse("DB_MAX_CONNECTIONS", raw)?)
        .map_err(|e| AppError::Config(format!("Invalid DB_MAX_CONNECTIONS: {}", e)))?,
      None => defaults.db_max_connections,
    };
    let db_acquire_timeout = match lookup("DB_ACQUIRE_TIMEOUT_SECS") {
      Some(raw) => Duration::from_secs(parse("DB_ACQUIRE_TIMEOUT_SECS", raw)?),
      None => defaults.db_acquire_timeout,
    };
    let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
      None | Some("") | Some("pretty") => LogFormat::Pretty,
      Some("json") => LogFormat::Json,
      Some(other) => {
        return Err(AppError::Config(format!(
          "Invalid LOG_FORMAT '{}': expected 'pretty' or 'json'",
          other
        )))
      }
    };

    Ok(Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      db_acquire_timeout,
      log_format,
    })
  }
}
