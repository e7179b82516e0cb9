use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::account::errors::{AccountError, HashError};
use crate::domain::account::ports::PasswordHasher;
use crate::domain::account::value_objects::{Password, PasswordHash};

/// Argon2id password hasher implementation
///
/// The work factor is fixed for the whole deployment:
/// - Memory cost: 19 MiB (19456 KiB)
/// - Time cost: 2 iterations
/// - Parallelism: 1 thread
///
/// Hashes are emitted as PHC strings, so the parameters and salt travel with
/// the hash and any Argon2 implementation can verify it.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  const MEMORY_COST_KIB: u32 = 19456;
  const TIME_COST: u32 = 2;
  const PARALLELISM: u32 = 1;
  const OUTPUT_LEN: usize = 32;

  pub fn new() -> Result<Self, AccountError> {
    let params = Params::new(
      Self::MEMORY_COST_KIB,
      Self::TIME_COST,
      Self::PARALLELISM,
      Some(Self::OUTPUT_LEN),
    )
    .map_err(|e| {
      AccountError::Hash(HashError::HashingFailed(format!(
        "Failed to create Argon2 params: {}",
        e
      )))
    })?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    Ok(Self { argon2 })
  }

  fn hash_blocking(argon2: &Argon2<'static>, password: &Password) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);

    argon2
      .hash_password(password.as_str().as_bytes(), &salt)
      .map(|hash| hash.to_string())
      .map_err(|e| HashError::HashingFailed(e.to_string()))
  }

  fn verify_blocking(
    argon2: &Argon2<'static>,
    password: &Password,
    hashed_password: &str,
  ) -> Result<bool, HashError> {
    let parsed_hash = Argon2PasswordHash::new(hashed_password)
      .map_err(|e| HashError::VerificationFailed(format!("Invalid hash format: {}", e)))?;

    // verify_password compares in constant time
    match argon2.verify_password(password.as_str().as_bytes(), &parsed_hash) {
      Ok(_) => Ok(true),
      Err(argon2::password_hash::Error::Password) => Ok(false),
      Err(e) => Err(HashError::VerificationFailed(e.to_string())),
    }
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  /// Hashes on the blocking pool so argon2 does not stall an async worker
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AccountError> {
    let argon2 = self.argon2.clone();
    let password = password.clone();

    let hash = tokio::task::spawn_blocking(move || Self::hash_blocking(&argon2, &password))
      .await
      .map_err(|e| HashError::HashingFailed(format!("Hashing task failed: {}", e)))??;

    Ok(PasswordHash::from_hash(hash)?)
  }

  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AccountError> {
    let argon2 = self.argon2.clone();
    let password = password.clone();
    let hashed_password = hashed_password.as_str().to_string();

    let is_valid = tokio::task::spawn_blocking(move || {
      Self::verify_blocking(&argon2, &password, &hashed_password)
    })
    .await
    .map_err(|e| HashError::VerificationFailed(format!("Verification task failed: {}", e)))??;

    Ok(is_valid)
  }
}
