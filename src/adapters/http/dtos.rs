use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::account::entities::Account;

/// Request body for `POST /signup`
///
/// Missing fields decode as empty strings and are then rejected by validation,
/// so the client gets a field-specific message instead of a decode error.
#[derive(Clone, Deserialize, Validate)]
pub struct SignupRequest {
  #[serde(default)]
  #[validate(
    length(min = 1, message = "Email is required"),
    email(message = "Invalid email format")
  )]
  pub email: String,

  #[serde(default)]
  #[validate(length(max = 255, message = "First name must be at most 255 characters"))]
  pub firstname: String,

  #[serde(default)]
  #[validate(length(max = 255, message = "Last name must be at most 255 characters"))]
  pub lastname: String,

  #[serde(default)]
  #[validate(length(
    min = 1,
    max = 128,
    message = "Password must be between 1 and 128 characters"
  ))]
  pub password: String,
}

/// Public view of an account; the password hash has no field here
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
  pub id: i64,
  pub email: String,
  pub firstname: String,
  pub lastname: String,
}

impl From<Account> for AccountResponse {
  fn from(account: Account) -> Self {
    Self {
      id: account.id.value(),
      email: account.email,
      firstname: account.first_name,
      lastname: account.last_name,
    }
  }
}

/// Standard error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
  /// Human-readable error message
  pub message: String,
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  fn request(email: &str, password: &str) -> SignupRequest {
    SignupRequest {
      email: email.to_string(),
      firstname: "Tom".to_string(),
      lastname: "T".to_string(),
      password: password.to_string(),
    }
  }

  #[test]
  fn test_signup_request_validation_valid() {
    assert!(request("tom@x.com", "abc123").validate().is_ok());
  }

  #[test]
  fn test_signup_request_validation_invalid_email() {
    assert!(request("invalid-email", "abc123").validate().is_err());
  }

  #[test]
  fn test_signup_request_validation_empty_password() {
    assert!(request("tom@x.com", "").validate().is_err());
  }

  #[test]
  fn test_signup_request_password_length_counts_characters() {
    assert!(request("tom@x.com", &"é".repeat(128)).validate().is_ok());
    assert!(request("tom@x.com", &"é".repeat(129)).validate().is_err());
  }

  #[test]
  fn test_signup_request_missing_fields_default_to_empty() {
    let json = r#"{"email": "tom@x.com"}"#;
    let request: SignupRequest = serde_json::from_str(json).unwrap();

    assert!(request.password.is_empty());
    assert!(request.firstname.is_empty());
    assert!(request.validate().is_err());
  }

  #[test]
  fn test_account_response_has_no_password() {
    let account = Account::from_db(
      1,
      "tom@x.com".to_string(),
      "Tom".to_string(),
      "T".to_string(),
      "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
      Utc::now(),
    );

    let json = serde_json::to_value(AccountResponse::from(account)).unwrap();

    assert_eq!(
      json,
      serde_json::json!({
        "id": 1,
        "email": "tom@x.com",
        "firstname": "Tom",
        "lastname": "T",
      })
    );
  }
}
