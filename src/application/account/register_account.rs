use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::domain::account::entities::{Account, TokenPair};
use crate::domain::account::errors::AccountError;
use crate::domain::account::services::{AccountService, RegistrationRequest};
use crate::domain::account::value_objects::{Email, Password};
use crate::infrastructure::metrics;

/// Command for registering a new account
#[derive(Clone)]
pub struct RegisterAccountCommand {
  pub email: String,
  /// Plain text, hashed and zeroized by the engine
  pub password: String,
  pub first_name: String,
  pub last_name: String,
}

/// Response after successful registration
#[derive(Debug, Clone)]
pub struct RegisterAccountResponse {
  pub account: Account,
  pub tokens: TokenPair,
}

/// Use case for registering a new account
pub struct RegisterAccountUseCase {
  account_service: Arc<AccountService>,
  timeout: Duration,
}

impl RegisterAccountUseCase {
  pub fn new(account_service: Arc<AccountService>, timeout: Duration) -> Self {
    Self {
      account_service,
      timeout,
    }
  }

  /// Executes the registration use case
  ///
  /// The whole flow is bound to `cancel` and to the configured timeout;
  /// whichever fires first aborts the outstanding step. Nothing already
  /// written is rolled back.
  ///
  /// # Errors
  /// Returns `AccountError` if validation, storage, hashing or signing fails,
  /// `AccountError::Cancelled` / `AccountError::Timeout` if aborted.
  pub async fn execute(
    &self,
    command: RegisterAccountCommand,
    cancel: &CancellationToken,
  ) -> Result<RegisterAccountResponse, AccountError> {
    let result = self.run(command, cancel).await;

    metrics::record_registration(result.as_ref().map(|_| ()).map_err(AccountError::reason));

    result
  }

  async fn run(
    &self,
    command: RegisterAccountCommand,
    cancel: &CancellationToken,
  ) -> Result<RegisterAccountResponse, AccountError> {
    let RegisterAccountCommand {
      email,
      password,
      first_name,
      last_name,
    } = command;

    let request = RegistrationRequest {
      email: Email::new(email)?,
      password: Password::new(password)?,
      first_name,
      last_name,
    };

    let registration = tokio::time::timeout(self.timeout, self.account_service.register(request));

    let (account, tokens) = tokio::select! {
      biased;
      _ = cancel.cancelled() => return Err(AccountError::Cancelled),
      outcome = registration => outcome.map_err(|_| AccountError::Timeout {
        seconds: self.timeout.as_secs(),
      })??,
    };

    Ok(RegisterAccountResponse { account, tokens })
  }
}
