use actix_web::{HttpResponse, error::JsonPayloadError, web};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::application::account::RegisterAccountUseCase;

use super::errors::ApiError;
use super::handlers::{metrics_handler, signup_handler};

/// Largest sign-up body accepted, in bytes
const SIGNUP_BODY_LIMIT: usize = 16 * 1024;

fn json_error_handler(err: JsonPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
  ApiError::MalformedBody(err.to_string()).into()
}

/// Configure account routes
///
/// # Routes
///
/// - POST /signup - Register a new account and issue its tokens
///
/// # Arguments
///
/// * `register_use_case` - Use case for account registration
/// * `shutdown` - Root token; each request runs under a child of it
///
/// # Example
///
/// ```no_run
/// use actix_web::App;
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
/// # use shp::application::account::RegisterAccountUseCase;
/// # use shp::adapters::http::routes::configure_account_routes;
///
/// # fn example(register_use_case: Arc<RegisterAccountUseCase>) {
/// let shutdown = CancellationToken::new();
/// let app = App::new().configure(|cfg| {
///   configure_account_routes(cfg, register_use_case, shutdown)
/// });
/// # }
/// ```
pub fn configure_account_routes(
  cfg: &mut web::ServiceConfig,
  register_use_case: Arc<RegisterAccountUseCase>,
  shutdown: CancellationToken,
) {
  cfg
    .app_data(web::Data::new(register_use_case))
    .app_data(web::Data::new(shutdown))
    .app_data(
      web::JsonConfig::default()
        .limit(SIGNUP_BODY_LIMIT)
        .error_handler(json_error_handler),
    )
    .route("/signup", web::post().to(signup_handler));
}

/// Configure operational routes
///
/// - GET /metrics - Prometheus scrape endpoint
/// - GET /health - Liveness check
pub fn configure_ops_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/metrics", web::get().to(metrics_handler))
    .route("/health", web::get().to(health_check));
}

async fn health_check() -> HttpResponse {
  HttpResponse::Ok().body("OK")
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{
    App,
    http::{StatusCode, header::ContentType},
    test::{self, TestRequest},
  };

  #[actix_web::test]
  async fn test_health_check() {
    let app = test::init_service(App::new().configure(configure_ops_routes)).await;

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "OK".as_bytes());
  }

  #[actix_web::test]
  async fn test_json_error_handler_maps_to_bad_request() {
    async fn echo(body: web::Json<serde_json::Value>) -> HttpResponse {
      HttpResponse::Ok().json(body.into_inner())
    }

    let app = test::init_service(
      App::new()
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/", web::post().to(echo)),
    )
    .await;

    let req = TestRequest::post()
      .uri("/")
      .insert_header(ContentType::json())
      .set_payload("not json")
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Bad Request");
  }
}
