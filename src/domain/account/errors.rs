use thiserror::Error;

/// Main registration error type
#[derive(Debug, Error)]
pub enum AccountError {
  #[error("Email address is already taken")]
  EmailTaken,

  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("Storage error: {0}")]
  Storage(#[from] RepositoryError),

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),

  #[error("Token error: {0}")]
  Token(#[from] TokenError),

  #[error("Operation timed out after {seconds} seconds")]
  Timeout { seconds: u64 },

  #[error("Operation was cancelled")]
  Cancelled,
}

impl AccountError {
  /// Short, stable label used for metrics
  pub fn reason(&self) -> &'static str {
    match self {
      AccountError::EmailTaken => "email_taken",
      AccountError::Validation(_) => "validation",
      AccountError::Storage(_) => "storage",
      AccountError::Hash(_) => "hashing",
      AccountError::Token(_) => "signing",
      AccountError::Timeout { .. } => "timeout",
      AccountError::Cancelled => "cancelled",
    }
  }
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Failed to verify password: {0}")]
  VerificationFailed(String),

  #[error("Invalid hash format")]
  InvalidFormat,
}

/// Token signing and verification errors
#[derive(Debug, Error)]
pub enum TokenError {
  #[error("Failed to sign token: {0}")]
  SigningFailed(String),

  #[error("Token has expired")]
  Expired,

  #[error("Token was not issued for {expected} use")]
  WrongKind { expected: &'static str },

  #[error("Invalid token: {0}")]
  Invalid(String),
}

/// Input validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
  #[error("Invalid email format")]
  InvalidEmail,

  #[error("Missing required field: {field}")]
  MissingField { field: String },

  #[error("Field {field} is too long, maximum {max} characters allowed")]
  FieldTooLong { field: String, max: usize },
}

// Automatic conversions from external error types

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      sqlx::Error::Io(e) => RepositoryError::ConnectionFailed(e.to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for AccountError {
  fn from(error: sqlx::Error) -> Self {
    AccountError::Storage(RepositoryError::from(error))
  }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
  fn from(error: jsonwebtoken::errors::Error) -> Self {
    use jsonwebtoken::errors::ErrorKind;
    match error.kind() {
      ErrorKind::ExpiredSignature => TokenError::Expired,
      ErrorKind::InvalidKeyFormat => TokenError::SigningFailed(error.to_string()),
      _ => TokenError::Invalid(error.to_string()),
    }
  }
}
