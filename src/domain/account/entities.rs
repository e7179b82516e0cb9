use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::value_objects::{AccountId, Email, PasswordHash};

/// Account entity representing a registered user
#[derive(Debug, Clone, Serialize)]
pub struct Account {
  /// Identity generated by storage
  pub id: AccountId,
  /// Email address (unique, case-sensitive)
  pub email: String,
  pub first_name: String,
  pub last_name: String,
  /// Argon2id PHC string; never leaves the process
  #[serde(skip_serializing)]
  pub password_hash: String,
  /// Timestamp when the account was created
  pub created_at: DateTime<Utc>,
}

impl Account {
  /// Creates an account from database fields (for reconstruction)
  pub fn from_db(
    id: i64,
    email: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id: AccountId::new(id),
      email,
      first_name,
      last_name,
      password_hash,
      created_at,
    }
  }
}

/// Input for the storage create operation.
///
/// Only ever carries the hashed password.
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub email: Email,
  pub first_name: String,
  pub last_name: String,
  pub password_hash: PasswordHash,
}

/// Token class, carried in the `typ` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
  Access,
  Refresh,
}

impl TokenKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      TokenKind::Access => "access",
      TokenKind::Refresh => "refresh",
    }
  }
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Claims carried by every issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  /// Account identity as a decimal string
  pub sub: String,
  /// Issued-at, seconds since the epoch
  pub iat: i64,
  /// Expiration, seconds since the epoch
  pub exp: i64,
  /// Service identifier
  pub iss: String,
  pub typ: TokenKind,
}

impl Claims {
  pub fn new(
    account_id: AccountId,
    kind: TokenKind,
    issuer: impl Into<String>,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
  ) -> Self {
    Self {
      sub: account_id.to_string(),
      iat: issued_at.timestamp(),
      exp: expires_at.timestamp(),
      iss: issuer.into(),
      typ: kind,
    }
  }

  /// Parses the subject back into an account identity
  pub fn account_id(&self) -> Option<AccountId> {
    self.sub.parse::<i64>().ok().map(AccountId::new)
  }
}

/// A signed token together with its expiry
#[derive(Clone)]
pub struct IssuedToken {
  pub token: String,
  pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for IssuedToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("IssuedToken")
      .field("token", &"***")
      .field("expires_at", &self.expires_at)
      .finish()
  }
}

/// Access and refresh tokens issued together at sign-up
#[derive(Debug, Clone)]
pub struct TokenPair {
  pub access: IssuedToken,
  pub refresh: IssuedToken,
}
