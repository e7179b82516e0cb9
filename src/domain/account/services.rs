use std::sync::Arc;

use super::entities::{Account, NewAccount, TokenPair};
use super::errors::{AccountError, RepositoryError};
use super::ports::{AccountRepository, PasswordHasher, TokenIssuer};
use super::value_objects::{Email, Password};

/// Validated sign-up input handed to the registration engine
#[derive(Debug)]
pub struct RegistrationRequest {
  pub email: Email,
  pub password: Password,
  pub first_name: String,
  pub last_name: String,
}

/// Registration engine: uniqueness check, hashing, persistence and token
/// issuance for new accounts
pub struct AccountService {
  account_repo: Arc<dyn AccountRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  token_issuer: Arc<dyn TokenIssuer>,
}

impl AccountService {
  /// Creates a new instance of AccountService
  pub fn new(
    account_repo: Arc<dyn AccountRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_issuer: Arc<dyn TokenIssuer>,
  ) -> Self {
    Self {
      account_repo,
      password_hasher,
      token_issuer,
    }
  }

  /// Registers a new account and issues its access and refresh tokens
  ///
  /// # Returns
  /// The persisted account and the freshly issued token pair
  ///
  /// # Errors
  /// - `AccountError::EmailTaken` if the email is already registered, either
  ///   found by the pre-check or reported by the unique constraint on insert
  /// - `AccountError::Storage` on any other storage failure
  /// - `AccountError::Hash` / `AccountError::Token` on hashing or signing failure
  ///
  /// If signing fails after the insert, the account row stays persisted.
  pub async fn register(
    &self,
    request: RegistrationRequest,
  ) -> Result<(Account, TokenPair), AccountError> {
    let RegistrationRequest {
      email,
      password,
      first_name,
      last_name,
    } = request;

    if self.account_repo.find_by_email(&email).await?.is_some() {
      tracing::debug!("Registration rejected: email already taken");
      return Err(AccountError::EmailTaken);
    }

    let password_hash = self.password_hasher.hash(&password).await?;
    // Zeroizes the plaintext
    drop(password);

    let new_account = NewAccount {
      email,
      first_name,
      last_name,
      password_hash,
    };

    // The pre-check is not atomic with the insert; the unique constraint decides.
    let account = match self.account_repo.create(new_account).await {
      Ok(account) => account,
      Err(AccountError::Storage(RepositoryError::DuplicateKey(detail))) => {
        tracing::debug!(%detail, "Registration lost a race on the email constraint");
        return Err(AccountError::EmailTaken);
      }
      Err(e) => return Err(e),
    };

    tracing::info!(account_id = %account.id, "Account created");

    let access = self.token_issuer.issue_access_token(account.id).await?;
    let refresh = self.token_issuer.issue_refresh_token(account.id).await?;

    Ok((account, TokenPair { access, refresh }))
  }
}
