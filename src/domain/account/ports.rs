use async_trait::async_trait;

use super::entities::{Account, Claims, IssuedToken, NewAccount, TokenKind};
use super::errors::AccountError;
use super::value_objects::{AccountId, Email, Password, PasswordHash};

/// Repository trait for account persistence operations
#[async_trait]
pub trait AccountRepository: Send + Sync {
  /// Finds an account by its exact email address
  async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountError>;

  /// Inserts a new account and returns the stored row, including its
  /// generated identity.
  ///
  /// A clash with the unique email constraint is reported as
  /// `RepositoryError::DuplicateKey`.
  async fn create(&self, account: NewAccount) -> Result<Account, AccountError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password with a fresh random salt
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AccountError>;

  /// Verifies a plain text password against a hashed password
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AccountError>;
}

/// Service trait for signed session token issuance
#[async_trait]
pub trait TokenIssuer: Send + Sync {
  /// Issues a short-lived access token for the account
  async fn issue_access_token(&self, account_id: AccountId) -> Result<IssuedToken, AccountError>;

  /// Issues a long-lived refresh token for the account
  async fn issue_refresh_token(&self, account_id: AccountId)
  -> Result<IssuedToken, AccountError>;

  /// Checks signature, expiry, issuer and class of a token and returns its claims
  async fn verify(&self, kind: TokenKind, token: &str) -> Result<Claims, AccountError>;
}
