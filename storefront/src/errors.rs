// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Invalid Identifier: {0}")]
  InvalidId(String),

  #[error("Storage Error: {0}")]
  Storage(StoreError),

  // A stored document no longer matches its entity type.
  #[error("Document Decode Error: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<StoreError> for AppError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::InvalidId(id) => AppError::InvalidId(id),
      StoreError::OutOfRange(detail) => AppError::Validation(detail),
      other => AppError::Storage(other),
    }
  }
}

impl AppError {
  /// Status this error carries on its own, regardless of the endpoint that raised it.
  fn intrinsic_status(&self) -> Option<StatusCode> {
    match self {
      AppError::Validation(_) | AppError::InvalidId(_) => Some(StatusCode::BAD_REQUEST),
      AppError::NotFound(_) => Some(StatusCode::NOT_FOUND),
      _ => None,
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    self.intrinsic_status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
  }

  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    let message = match self {
      AppError::Validation(m) | AppError::NotFound(m) => m.clone(),
      AppError::InvalidId(id) => format!("Invalid id '{}'", id),
      _ => "An internal error occurred".to_string(),
    };
    HttpResponse::build(self.status_code()).json(json!({ "error": message }))
  }
}

/// An [`AppError`] as answered by one particular endpoint.
///
/// Each route names the status and message it falls back to (400 for writes,
/// 500 for reads). Not-found and malformed-input errors keep their own status.
#[derive(Debug, Error)]
#[error("{message}: {source}")]
pub struct ApiError {
  status: StatusCode,
  message: &'static str,
  #[source]
  source: AppError,
}

impl ApiError {
  pub fn new(source: AppError, fallback: StatusCode, message: &'static str) -> Self {
    let status = source.intrinsic_status().unwrap_or(fallback);
    Self { status, message, source }
  }

  pub fn app_error(&self) -> &AppError {
    &self.source
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    self.status
  }

  fn error_response(&self) -> HttpResponse {
    if self.status.is_server_error() {
      tracing::error!(application_error = %self.source, status = %self.status, "Responding with error");
    } else {
      tracing::warn!(application_error = %self.source, status = %self.status, "Responding with error");
    }
    let message = match &self.source {
      AppError::NotFound(m) => m.as_str(),
      _ => self.message,
    };
    HttpResponse::build(self.status).json(json!({ "error": message }))
  }
}

/// Attaches an endpoint's fallback status and message to a service result.
pub trait RespondWith<T> {
  fn respond_with(self, fallback: StatusCode, message: &'static str) -> std::result::Result<T, ApiError>;
}

impl<T> RespondWith<T> for Result<T> {
  fn respond_with(self, fallback: StatusCode, message: &'static str) -> std::result::Result<T, ApiError> {
    self.map_err(|e| ApiError::new(e, fallback, message))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn store_invalid_id_becomes_client_error() {
    let err: AppError = StoreError::InvalidId("xyz".into()).into();
    assert!(matches!(err, AppError::InvalidId(ref id) if id == "xyz"));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
  }

  #[test]
  fn out_of_range_increment_is_a_client_error() {
    let err: AppError = StoreError::OutOfRange("stock".into()).into();
    let api = ApiError::new(err, StatusCode::INTERNAL_SERVER_ERROR, "Failed to create order");
    assert_eq!(api.status_code(), StatusCode::BAD_REQUEST);
  }

  #[test]
  fn storage_failures_take_the_endpoint_fallback() {
    let read = ApiError::new(
      StoreError::Unavailable("down".into()).into(),
      StatusCode::INTERNAL_SERVER_ERROR,
      "Failed to fetch products",
    );
    assert_eq!(read.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let write = ApiError::new(
      StoreError::Unavailable("down".into()).into(),
      StatusCode::BAD_REQUEST,
      "Failed to add product",
    );
    assert_eq!(write.status_code(), StatusCode::BAD_REQUEST);
  }

  #[test]
  fn not_found_overrides_fallback() {
    let err = ApiError::new(
      AppError::NotFound("Product not found".into()),
      StatusCode::INTERNAL_SERVER_ERROR,
      "Failed to fetch product",
    );
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    assert!(matches!(err.app_error(), AppError::NotFound(_)));
  }
}
