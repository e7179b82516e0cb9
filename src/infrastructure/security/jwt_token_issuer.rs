use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::domain::account::entities::{Claims, IssuedToken, TokenKind};
use crate::domain::account::errors::{AccountError, TokenError};
use crate::domain::account::ports::TokenIssuer;
use crate::domain::account::value_objects::AccountId;
use crate::infrastructure::config::SecurityConfig;

/// Signing material and lifetimes for both token classes
#[derive(Clone)]
pub struct TokenSettings {
  pub access_secret: String,
  pub refresh_secret: String,
  pub access_ttl: Duration,
  pub refresh_ttl: Duration,
  pub issuer: String,
}

impl TokenSettings {
  pub fn from_config(security: &SecurityConfig) -> Self {
    Self {
      access_secret: security.access_token_secret.clone(),
      refresh_secret: security.refresh_token_secret.clone(),
      access_ttl: ttl_from_seconds(security.access_token_ttl_seconds),
      refresh_ttl: ttl_from_seconds(security.refresh_token_ttl_seconds),
      issuer: security.token_issuer.clone(),
    }
  }
}

/// Out-of-range values saturate; `issue` then fails instead of overflowing
fn ttl_from_seconds(seconds: u64) -> Duration {
  i64::try_from(seconds)
    .ok()
    .and_then(Duration::try_seconds)
    .unwrap_or(Duration::MAX)
}

struct KeyPair {
  encoding: EncodingKey,
  decoding: DecodingKey,
  ttl: Duration,
}

impl KeyPair {
  fn new(secret: &str, ttl: Duration) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      ttl,
    }
  }
}

/// HS256 JWT issuer with a separate secret per token class
pub struct JwtTokenIssuer {
  access: KeyPair,
  refresh: KeyPair,
  issuer: String,
}

impl JwtTokenIssuer {
  pub fn new(settings: TokenSettings) -> Self {
    Self {
      access: KeyPair::new(&settings.access_secret, settings.access_ttl),
      refresh: KeyPair::new(&settings.refresh_secret, settings.refresh_ttl),
      issuer: settings.issuer,
    }
  }

  fn keys(&self, kind: TokenKind) -> &KeyPair {
    match kind {
      TokenKind::Access => &self.access,
      TokenKind::Refresh => &self.refresh,
    }
  }

  fn issue(&self, account_id: AccountId, kind: TokenKind) -> Result<IssuedToken, TokenError> {
    let keys = self.keys(kind);
    let issued_at = Utc::now();
    let expires_at = issued_at.checked_add_signed(keys.ttl).ok_or_else(|| {
      TokenError::SigningFailed(format!("{} token lifetime out of range", kind))
    })?;

    let claims = Claims::new(account_id, kind, &self.issuer, issued_at, expires_at);

    let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
      .map_err(|e| TokenError::SigningFailed(e.to_string()))?;

    tracing::debug!(%account_id, kind = %kind, "Issued token");

    Ok(IssuedToken { token, expires_at })
  }

  fn decode_claims(&self, kind: TokenKind, token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&self.issuer]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let data = decode::<Claims>(token, &self.keys(kind).decoding, &validation)?;

    if data.claims.typ != kind {
      return Err(TokenError::WrongKind {
        expected: kind.as_str(),
      });
    }

    Ok(data.claims)
  }
}

#[async_trait]
impl TokenIssuer for JwtTokenIssuer {
  async fn issue_access_token(&self, account_id: AccountId) -> Result<IssuedToken, AccountError> {
    Ok(self.issue(account_id, TokenKind::Access)?)
  }

  async fn issue_refresh_token(
    &self,
    account_id: AccountId,
  ) -> Result<IssuedToken, AccountError> {
    Ok(self.issue(account_id, TokenKind::Refresh)?)
  }

  async fn verify(&self, kind: TokenKind, token: &str) -> Result<Claims, AccountError> {
    Ok(self.decode_claims(kind, token)?)
  }
}
