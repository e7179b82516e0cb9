use actix_web::{HttpResponse, http::header::ContentType};

use crate::adapters::http::errors::ApiError;
use crate::infrastructure::metrics;

/// Prometheus scrape endpoint
///
/// GET /metrics
pub async fn metrics_handler() -> Result<HttpResponse, ApiError> {
  let body = metrics::render().map_err(|e| ApiError::Internal(e.to_string()))?;

  Ok(
    HttpResponse::Ok()
      .content_type(ContentType::plaintext())
      .body(body),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{
    App,
    http::StatusCode,
    test::{self, TestRequest},
    web,
  };

  #[actix_web::test]
  async fn test_metrics_endpoint_exports_counters() {
    let app =
      test::init_service(App::new().route("/metrics", web::get().to(metrics_handler))).await;

    let req = TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("shp_accounts_registered_total"));
  }
}
