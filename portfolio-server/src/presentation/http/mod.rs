use axum::{Json, Router, response::Html, routing::get};
use serde::Serialize;

use super::AppState;

pub(crate) mod app_error;
pub(crate) mod envelope;
pub(crate) mod extract;
pub(crate) mod handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;
pub(crate) mod session;

pub(crate) fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing_handler))
        .route("/healthz", get(health_handler))
        .merge(routes::router(state.clone()))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthzResponse {
    status: &'static str,
}

async fn health_handler() -> Json<HealthzResponse> {
    Json(HealthzResponse { status: "ok" })
}

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Portfolio API</title>
  <style>
    body {
      margin: 0;
      font-family: 'Segoe UI', sans-serif;
      background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
      min-height: 100vh;
      display: flex;
      justify-content: center;
      align-items: center;
    }
    .container {
      background: white;
      padding: 50px 60px;
      border-radius: 15px;
      box-shadow: 0 10px 40px rgba(0,0,0,0.2);
      text-align: center;
    }
    h1 { color: #667eea; margin: 0 0 10px 0; font-size: 2.5em; }
    p { color: #666; margin: 10px 0; font-size: 1.1em; }
    .status { color: #4ade80; font-weight: bold; margin-top: 20px; }
  </style>
</head>
<body>
  <div class="container">
    <h1>Portfolio API</h1>
    <p>RESTful Backend Service</p>
    <p class="status">&#10003; Server Running</p>
    <p><a href="/swagger-ui">API documentation</a></p>
  </div>
</body>
</html>
"#;

async fn landing_handler() -> Html<&'static str> {
    Html(LANDING_PAGE)
}
