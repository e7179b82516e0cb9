use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::account::{
  entities::{Account, NewAccount},
  errors::{AccountError, RepositoryError},
  ports::AccountRepository,
  value_objects::Email,
};

/// In-process account store.
///
/// Mirrors the `users` table contract: sequential identities starting at 1
/// and a unique constraint on the exact email.
pub struct InMemoryAccountRepository {
  accounts: Mutex<Vec<Account>>,
  next_id: AtomicI64,
}

impl InMemoryAccountRepository {
  pub fn new() -> Self {
    Self {
      accounts: Mutex::new(Vec::new()),
      next_id: AtomicI64::new(1),
    }
  }

  /// Number of stored accounts
  pub fn len(&self) -> usize {
    self.lock().map(|accounts| accounts.len()).unwrap_or(0)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Account>>, AccountError> {
    self
      .accounts
      .lock()
      .map_err(|_| AccountError::Storage(RepositoryError::DatabaseError("store poisoned".into())))
  }
}

impl Default for InMemoryAccountRepository {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
  async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountError> {
    let accounts = self.lock()?;

    Ok(
      accounts
        .iter()
        .find(|account| account.email == email.as_str())
        .cloned(),
    )
  }

  async fn create(&self, account: NewAccount) -> Result<Account, AccountError> {
    let mut accounts = self.lock()?;

    if accounts.iter().any(|a| a.email == account.email.as_str()) {
      return Err(
        RepositoryError::DuplicateKey(format!(
          "Key (email)=({}) already exists",
          account.email
        ))
        .into(),
      );
    }

    let id = self.next_id.fetch_add(1, Ordering::SeqCst);
    let stored = Account::from_db(
      id,
      account.email.into_inner(),
      account.first_name,
      account.last_name,
      account.password_hash.into_inner(),
      Utc::now(),
    );
    accounts.push(stored.clone());

    Ok(stored)
  }
}
