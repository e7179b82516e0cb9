use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::account::{
  entities::{Account, NewAccount},
  errors::AccountError,
  ports::AccountRepository,
  value_objects::Email,
};

/// PostgreSQL implementation of the AccountRepository trait
pub struct PostgresAccountRepository {
  pool: PgPool,
}

impl PostgresAccountRepository {
  /// Creates a new instance of PostgresAccountRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
  id: i64,
  email: String,
  firstname: String,
  lastname: String,
  password_hash: String,
  created_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
  fn from(row: AccountRow) -> Self {
    Account::from_db(
      row.id,
      row.email,
      row.firstname,
      row.lastname,
      row.password_hash,
      row.created_at,
    )
  }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
  async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AccountError> {
    let row = sqlx::query_as::<_, AccountRow>(
      r#"
            SELECT id, email, firstname, lastname, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
    )
    .bind(email.as_str())
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Account::from))
  }

  async fn create(&self, account: NewAccount) -> Result<Account, AccountError> {
    let row = sqlx::query_as::<_, AccountRow>(
      r#"
            INSERT INTO users (email, firstname, lastname, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, firstname, lastname, password_hash, created_at
            "#,
    )
    .bind(account.email.as_str())
    .bind(&account.first_name)
    .bind(&account.last_name)
    .bind(account.password_hash.as_str())
    .fetch_one(&self.pool)
    .await?;

    Ok(row.into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::account::errors::RepositoryError;
  use crate::domain::account::value_objects::PasswordHash;
  use sqlx::postgres::PgPoolOptions;
  use testcontainers::ImageExt;
  use testcontainers_modules::postgres::Postgres;
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  const HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHRzYWx0$aGFzaGhhc2hoYXNoaGFzaGhhc2hoYXNoaGFzaGhhc2g";

  async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
    let container = Postgres::default()
      .with_tag("16-alpine")
      .start()
      .await
      .expect("Failed to start postgres container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
      .get_host_port_ipv4(5432)
      .await
      .expect("Failed to get port");
    let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPoolOptions::new()
      .max_connections(5)
      .connect(&database_url)
      .await
      .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
      .run(&pool)
      .await
      .expect("Failed to run migrations");

    (pool, container)
  }

  fn new_account(email: &str) -> NewAccount {
    NewAccount {
      email: Email::new(email).unwrap(),
      first_name: "Tom".to_string(),
      last_name: "T".to_string(),
      password_hash: PasswordHash::from_hash(HASH).unwrap(),
    }
  }

  #[tokio::test]
  async fn test_create_returns_generated_identity() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresAccountRepository::new(pool);

    let first = repo.create(new_account("one@x.com")).await.unwrap();
    let second = repo.create(new_account("two@x.com")).await.unwrap();

    assert_eq!(first.email, "one@x.com");
    assert_eq!(first.first_name, "Tom");
    assert_eq!(first.password_hash, HASH);
    assert_ne!(first.id, second.id);
  }

  #[tokio::test]
  async fn test_find_by_email() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresAccountRepository::new(pool);

    let created = repo.create(new_account("find@x.com")).await.unwrap();

    let found = repo
      .find_by_email(&Email::new("find@x.com").unwrap())
      .await
      .unwrap()
      .expect("account should exist");
    assert_eq!(found.id, created.id);

    let missing = repo
      .find_by_email(&Email::new("missing@x.com").unwrap())
      .await
      .unwrap();
    assert!(missing.is_none());
  }

  #[tokio::test]
  async fn test_lookup_is_case_sensitive() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresAccountRepository::new(pool);

    repo.create(new_account("case@x.com")).await.unwrap();

    let found = repo
      .find_by_email(&Email::new("CASE@x.com").unwrap())
      .await
      .unwrap();
    assert!(found.is_none());
  }

  #[tokio::test]
  async fn test_duplicate_email() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresAccountRepository::new(pool);

    repo.create(new_account("duplicate@x.com")).await.unwrap();
    let result = repo.create(new_account("duplicate@x.com")).await;

    match result {
      Err(AccountError::Storage(RepositoryError::DuplicateKey(_))) => {}
      other => panic!("Expected Storage(DuplicateKey) error, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_email_is_bound_not_interpolated() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresAccountRepository::new(pool.clone());

    let hostile = "o'brien@x.com";
    repo.create(new_account(hostile)).await.unwrap();

    let found = repo
      .find_by_email(&Email::new(hostile).unwrap())
      .await
      .unwrap();
    assert!(found.is_some());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
      .fetch_one(&pool)
      .await
      .unwrap();
    assert_eq!(count, 1);
  }
}
