use actix_web::{
  HttpResponse,
  cookie::{Cookie, SameSite, time::Duration as CookieDuration},
  web,
};
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::adapters::http::{
  dtos::{AccountResponse, SignupRequest},
  errors::ApiError,
};
use crate::application::account::{RegisterAccountCommand, RegisterAccountUseCase};
use crate::domain::account::entities::IssuedToken;

/// Cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "atk";
/// Cookie carrying the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "rtk";

/// HTTP-only cookie that expires together with the token it carries
fn token_cookie(name: &'static str, token: &IssuedToken) -> Cookie<'static> {
  let max_age = (token.expires_at - Utc::now()).num_seconds().max(0);

  Cookie::build(name, token.token.clone())
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .max_age(CookieDuration::seconds(max_age))
    .finish()
}

/// Handler for account sign-up
///
/// POST /signup
/// Body: SignupRequest (JSON)
/// Response: AccountResponse (JSON) with status 200, tokens in `atk`/`rtk` cookies
pub async fn signup_handler(
  request: web::Json<SignupRequest>,
  use_case: web::Data<Arc<RegisterAccountUseCase>>,
  shutdown: web::Data<CancellationToken>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let SignupRequest {
    email,
    firstname,
    lastname,
    password,
  } = request.into_inner();

  let command = RegisterAccountCommand {
    email,
    password,
    first_name: firstname,
    last_name: lastname,
  };

  // Cancelled when the server shuts down
  let cancel = shutdown.child_token();
  let response = use_case.execute(command, &cancel).await?;

  Ok(
    HttpResponse::Ok()
      .cookie(token_cookie(ACCESS_TOKEN_COOKIE, &response.tokens.access))
      .cookie(token_cookie(REFRESH_TOKEN_COOKIE, &response.tokens.refresh))
      .json(AccountResponse::from(response.account)),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::http::routes::configure_account_routes;
  use crate::domain::account::entities::TokenKind;
  use crate::domain::account::ports::TokenIssuer;
  use crate::domain::account::services::AccountService;
  use crate::infrastructure::persistence::memory::InMemoryAccountRepository;
  use crate::infrastructure::security::{Argon2PasswordHasher, JwtTokenIssuer, TokenSettings};
  use actix_web::{
    App,
    http::{StatusCode, header::ContentType},
    test::{self, TestRequest},
  };
  use serde_json::{Value, json};
  use std::time::Duration;

  struct Harness {
    repo: Arc<InMemoryAccountRepository>,
    issuer: Arc<JwtTokenIssuer>,
    use_case: Arc<RegisterAccountUseCase>,
  }

  fn harness() -> Harness {
    let repo = Arc::new(InMemoryAccountRepository::new());
    let issuer = Arc::new(JwtTokenIssuer::new(TokenSettings {
      access_secret: "access-secret".to_string(),
      refresh_secret: "refresh-secret".to_string(),
      access_ttl: chrono::Duration::days(1),
      refresh_ttl: chrono::Duration::days(30),
      issuer: "localhost".to_string(),
    }));
    let service = Arc::new(AccountService::new(
      repo.clone(),
      Arc::new(Argon2PasswordHasher::new().unwrap()),
      issuer.clone(),
    ));
    let use_case = Arc::new(RegisterAccountUseCase::new(
      service,
      Duration::from_secs(10),
    ));

    Harness {
      repo,
      issuer,
      use_case,
    }
  }

  fn tom() -> Value {
    json!({
      "email": "tom@x.com",
      "firstname": "Tom",
      "lastname": "T",
      "password": "abc123"
    })
  }

  #[actix_web::test]
  async fn test_signup_then_repeat() {
    let h = harness();
    let app = test::init_service(App::new().configure(|cfg| {
      configure_account_routes(cfg, h.use_case.clone(), CancellationToken::new())
    }))
    .await;

    let req = TestRequest::post()
      .uri("/signup")
      .set_json(tom())
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookies: Vec<Cookie<'static>> = resp
      .response()
      .cookies()
      .map(|c| c.into_owned())
      .collect();
    let access = cookies
      .iter()
      .find(|c| c.name() == ACCESS_TOKEN_COOKIE)
      .expect("access cookie");
    let refresh = cookies
      .iter()
      .find(|c| c.name() == REFRESH_TOKEN_COOKIE)
      .expect("refresh cookie");
    assert_eq!(access.http_only(), Some(true));
    assert_eq!(refresh.http_only(), Some(true));
    assert!(access.max_age() < refresh.max_age());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "tom@x.com");
    assert_eq!(body["firstname"], "Tom");
    assert_eq!(body["lastname"], "T");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let id = body["id"].as_i64().expect("numeric id");
    let access_claims = h
      .issuer
      .verify(TokenKind::Access, access.value())
      .await
      .unwrap();
    let refresh_claims = h
      .issuer
      .verify(TokenKind::Refresh, refresh.value())
      .await
      .unwrap();
    assert_eq!(access_claims.sub, id.to_string());
    assert_eq!(refresh_claims.sub, id.to_string());

    let req = TestRequest::post()
      .uri("/signup")
      .set_json(tom())
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.response().cookies().count(), 0);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Email address is already taken" }));
    assert_eq!(h.repo.len(), 1);
  }

  #[actix_web::test]
  async fn test_signup_malformed_body() {
    let h = harness();
    let app = test::init_service(App::new().configure(|cfg| {
      configure_account_routes(cfg, h.use_case.clone(), CancellationToken::new())
    }))
    .await;

    let req = TestRequest::post()
      .uri("/signup")
      .insert_header(ContentType::json())
      .set_payload("{\"email\": ")
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Bad Request" }));
    assert!(h.repo.is_empty());
  }

  #[actix_web::test]
  async fn test_signup_missing_password() {
    let h = harness();
    let app = test::init_service(App::new().configure(|cfg| {
      configure_account_routes(cfg, h.use_case.clone(), CancellationToken::new())
    }))
    .await;

    let req = TestRequest::post()
      .uri("/signup")
      .set_json(json!({ "email": "tom@x.com", "firstname": "Tom", "lastname": "T" }))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
      body["message"],
      "Password must be between 1 and 128 characters"
    );
    assert!(h.repo.is_empty());
  }

  #[actix_web::test]
  async fn test_signup_after_shutdown_fails_internally() {
    let h = harness();
    let shutdown = CancellationToken::new();
    shutdown.cancel();
    let app = test::init_service(
      App::new().configure(|cfg| configure_account_routes(cfg, h.use_case.clone(), shutdown)),
    )
    .await;

    let req = TestRequest::post()
      .uri("/signup")
      .set_json(tom())
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Internal Server Error" }));
  }
}
