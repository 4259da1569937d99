//! Error types: core algorithm errors plus the HTTP-facing `ApiError`.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use thiserror::Error;

/// Malformed question input. Never degraded into an unshuffled question.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShuffleError {
  #[error("question '{question_id}' has no options")]
  EmptyOptions { question_id: String },

  #[error("question '{question_id}': correct option '{correct_option_id}' is not among its options")]
  CorrectOptionMissing { question_id: String, correct_option_id: String },

  #[error("question '{question_id}': option id '{option_id}' appears more than once")]
  DuplicateOptionId { question_id: String, option_id: String },
}

/// Caller errors for the concept distributor. An empty pool is not one of them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DistributeError {
  #[error("invalid distribution policy: {0}")]
  InvalidPolicy(String),

  #[error("concept id '{0}' appears more than once in the pool")]
  DuplicateItemId(String),
}

/// Settings that make the service unusable. Raised once, at startup.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
  #[error(transparent)]
  Policy(#[from] DistributeError),

  #[error("invalid [{section}] setting: {message}")]
  InvalidSetting { section: &'static str, message: String },
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Resource not found: {0}")]
  NotFound(String),

  #[error("Invalid request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Shuffle(#[from] ShuffleError),

  #[error(transparent)]
  Distribute(#[from] DistributeError),
}

impl ApiError {
  pub fn code(&self) -> &'static str {
    match self {
      ApiError::NotFound(_) => "NOT_FOUND",
      ApiError::BadRequest(_) => "BAD_REQUEST",
      ApiError::Shuffle(_) => "INVALID_QUESTION",
      ApiError::Distribute(_) => "INVALID_CONCEPTS",
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) | ApiError::Distribute(_) => StatusCode::BAD_REQUEST,
      // A bank question without its correct option is a data-integrity fault on our side.
      ApiError::Shuffle(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let body = Json(json!({
      "error": {
        "code": self.code(),
        "message": self.to_string(),
      }
    }));
    (self.status(), body).into_response()
  }
}

pub type ApiResult<T> = Result<T, ApiError>;
