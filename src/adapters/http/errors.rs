use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::account::errors::AccountError;

use super::dtos::ErrorResponse;

/// Message returned when the email is already registered
pub const EMAIL_TAKEN_MESSAGE: &str = "Email address is already taken";

/// API error type that maps domain errors to HTTP responses
///
/// This is the single place errors are logged.
#[derive(Debug)]
pub enum ApiError {
  /// Body could not be decoded (400); the detail is logged, not returned
  MalformedBody(String),

  /// Input failed validation (400)
  Validation(String),

  /// Email already registered (400)
  EmailTaken,

  /// Any other failure (500); the detail is logged, not returned
  Internal(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::MalformedBody(msg) => write!(f, "Malformed request body: {}", msg),
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::EmailTaken => f.write_str(EMAIL_TAKEN_MESSAGE),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::MalformedBody(_) | ApiError::Validation(_) | ApiError::EmailTaken => {
        StatusCode::BAD_REQUEST
      }
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();

    let message = match self {
      ApiError::MalformedBody(detail) => {
        tracing::warn!(%detail, "Rejected malformed request body");
        "Bad Request".to_string()
      }
      ApiError::Validation(msg) => {
        tracing::warn!(%msg, "Rejected invalid sign-up request");
        msg.clone()
      }
      ApiError::EmailTaken => {
        tracing::info!("Rejected sign-up for an email that is already taken");
        EMAIL_TAKEN_MESSAGE.to_string()
      }
      ApiError::Internal(msg) => {
        // Don't expose internal error details to clients
        tracing::error!("Internal error: {}", msg);
        "Internal Server Error".to_string()
      }
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(ErrorResponse { message })
  }
}

/// Convert AccountError to ApiError
impl From<AccountError> for ApiError {
  fn from(error: AccountError) -> Self {
    match error {
      AccountError::EmailTaken => ApiError::EmailTaken,
      AccountError::Validation(err) => ApiError::Validation(err.to_string()),
      AccountError::Storage(_)
      | AccountError::Hash(_)
      | AccountError::Token(_)
      | AccountError::Timeout { .. }
      | AccountError::Cancelled => ApiError::Internal(error.to_string()),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();

    // field_errors is a HashMap; keep the message stable
    messages.sort();
    messages.dedup();

    ApiError::Validation(messages.join(", "))
  }
}
