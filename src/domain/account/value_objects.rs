use argon2::PasswordHash as Argon2PasswordHash;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidateEmail;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::errors::{HashError, ValidationError};

// ============================================================================
// Email Value Object
// ============================================================================

/// Email address of an account.
///
/// Stored exactly as supplied: uniqueness is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  const MAX_LENGTH: usize = 254;

  /// Creates a new Email after validation
  pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
    let email = email.into();

    if email.is_empty() {
      return Err(ValidationError::MissingField {
        field: "email".to_string(),
      });
    }

    if email.len() > Self::MAX_LENGTH {
      return Err(ValidationError::FieldTooLong {
        field: "email".to_string(),
        max: Self::MAX_LENGTH,
      });
    }

    if !email.validate_email() {
      return Err(ValidationError::InvalidEmail);
    }

    Ok(Self(email))
  }

  /// Returns the email as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

/// Plaintext password supplied at sign-up.
///
/// The buffer is overwritten with zeroes when the value is dropped, so the
/// plaintext does not outlive hashing.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
  const MAX_LENGTH: usize = 128;

  pub fn new(password: impl Into<String>) -> Result<Self, ValidationError> {
    let password = password.into();

    if password.is_empty() {
      return Err(ValidationError::MissingField {
        field: "password".to_string(),
      });
    }

    // Counted in characters, matching the request validator
    if password.chars().count() > Self::MAX_LENGTH {
      return Err(ValidationError::FieldTooLong {
        field: "password".to_string(),
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(password))
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

// ============================================================================
// PasswordHash Value Object (PHC string)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Wraps an existing hash, rejecting anything that is not a PHC string
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, HashError> {
    let hash = hash.into();

    Argon2PasswordHash::new(&hash).map_err(|_| HashError::InvalidFormat)?;

    Ok(Self(hash))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

// ============================================================================
// AccountId Value Object
// ============================================================================

/// Identity assigned by storage when an account is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
  pub fn new(id: i64) -> Self {
    Self(id)
  }

  pub fn value(&self) -> i64 {
    self.0
  }
}

impl fmt::Display for AccountId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<i64> for AccountId {
  fn from(id: i64) -> Self {
    Self(id)
  }
}

impl From<AccountId> for i64 {
  fn from(id: AccountId) -> Self {
    id.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_email_keeps_case() {
    let email = Email::new("Tom@X.com").unwrap();
    assert_eq!(email.as_str(), "Tom@X.com");
  }

  #[test]
  fn test_email_rejects_empty() {
    assert!(matches!(
      Email::new(""),
      Err(ValidationError::MissingField { .. })
    ));
  }

  #[test]
  fn test_email_rejects_invalid_format() {
    assert!(matches!(
      Email::new("not-an-email"),
      Err(ValidationError::InvalidEmail)
    ));
  }

  #[test]
  fn test_password_accepts_short_non_empty() {
    assert!(Password::new("abc123").is_ok());
  }

  #[test]
  fn test_password_rejects_empty() {
    assert!(matches!(
      Password::new(""),
      Err(ValidationError::MissingField { .. })
    ));
  }

  #[test]
  fn test_password_limit_counts_characters() {
    // 100 characters, 200 bytes
    assert!(Password::new("é".repeat(100)).is_ok());
    assert!(matches!(
      Password::new("é".repeat(129)),
      Err(ValidationError::FieldTooLong { max: 128, .. })
    ));
  }

  #[test]
  fn test_password_rejects_too_long() {
    let long = "a".repeat(129);
    assert!(matches!(
      Password::new(long),
      Err(ValidationError::FieldTooLong { max: 128, .. })
    ));
  }

  #[test]
  fn test_password_debug_is_redacted() {
    let password = Password::new("hunter2").unwrap();
    assert_eq!(format!("{:?}", password), "Password(***)");
  }

  #[test]
  fn test_password_zeroize_clears_buffer() {
    let mut password = Password::new("hunter2").unwrap();
    password.zeroize();
    assert!(password.as_str().is_empty());
  }

  #[test]
  fn test_password_hash_rejects_non_phc() {
    assert!(matches!(
      PasswordHash::from_hash("plaintext"),
      Err(HashError::InvalidFormat)
    ));
  }

  #[test]
  fn test_account_id_display() {
    assert_eq!(AccountId::new(42).to_string(), "42");
  }
}
