//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Bodies follow the document-API conventions: `{"msg": ...}` for single
//! errors and `{"errors": [...]}` for field validation failures.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// One failed field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub value:    Option<String>,
  pub msg:      String,
  pub param:    String,
  pub location: &'static str,
}

impl FieldError {
  pub fn body(param: impl Into<String>, msg: impl Into<String>) -> Self {
    Self {
      value:    None,
      msg:      msg.into(),
      param:    param.into(),
      location: "body",
    }
  }

  pub fn with_value(mut self, value: impl Into<String>) -> Self {
    self.value = Some(value.into());
    self
  }
}

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("validation failed on {} field(s)", .0.len())]
  Validation(Vec<FieldError>),

  #[error("no token supplied")]
  MissingToken,

  #[error("token rejected")]
  InvalidToken,

  #[error("caller does not own this place")]
  Forbidden,

  #[error("place not found")]
  NotFound,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl From<placebook_core::Error> for ApiError {
  fn from(e: placebook_core::Error) -> Self {
    let msg = e.to_string();
    match e {
      placebook_core::Error::EmptyField(field) => {
        Self::Validation(vec![FieldError::body(field, msg)])
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, msg) = match self {
      ApiError::Validation(errors) => {
        return (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors })))
          .into_response();
      }
      ApiError::MissingToken => {
        (StatusCode::UNAUTHORIZED, "No token, authorization denied")
      }
      ApiError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token is not valid"),
      ApiError::Forbidden => (StatusCode::FORBIDDEN, "User not authorized"),
      ApiError::NotFound => (StatusCode::NOT_FOUND, "Place not found"),
      ApiError::Store(e) => {
        // Details stay in the log; callers get a generic message.
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error")
      }
    };
    (status, Json(json!({ "msg": msg }))).into_response()
  }
}
