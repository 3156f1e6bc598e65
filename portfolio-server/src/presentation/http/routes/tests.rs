use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::application::file_service::FileService;
use crate::application::user_service::UserService;
use crate::data::repositories::memory::{
    InMemoryBlogRepository, InMemoryFileRepository, InMemoryUserRepository, RecordingMediaStore,
};
use crate::infrastructure::jwt::JwtService;
use crate::presentation::AppState;
use crate::presentation::http::app_error::{TOKEN_INVALID_MESSAGE, TOKEN_MISSING_MESSAGE};

const SECRET: &str = "0123456789abcdef0123456789abcdef";
const BOUNDARY: &str = "portfolio-test-boundary";

struct TestApp {
    router: Router,
    media: RecordingMediaStore,
}

impl TestApp {
    fn new() -> Self {
        let media = RecordingMediaStore::new();
        let users = InMemoryUserRepository::new();
        let jwt = Arc::new(JwtService::new(SECRET, 3600));
        let max_upload_bytes = 4096;

        let state = AppState::new(
            Arc::new(AuthService::new(Arc::new(users.clone()), jwt.clone())),
            Arc::new(UserService::new(Arc::new(users))),
            Arc::new(BlogService::new(
                Arc::new(InMemoryBlogRepository::new()),
                Arc::new(media.clone()),
                max_upload_bytes,
            )),
            Arc::new(FileService::new(
                Arc::new(InMemoryFileRepository::new()),
                Arc::new(media.clone()),
                max_upload_bytes,
            )),
            jwt,
            max_upload_bytes,
        );

        Self {
            router: crate::presentation::http::routes(state),
            media,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router must respond");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body must be readable");
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("body must be json")
        };
        (status, headers, value)
    }

    async fn register(&self, username: &str, email: &str) -> (StatusCode, Value) {
        let (status, _, body) = self
            .send(json_request(
                "POST",
                "/api/v1/users/register",
                None,
                json!({"username": username, "email": email, "password": "very-secure-password"}),
            ))
            .await;
        (status, body)
    }

    async fn login_token(&self) -> String {
        self.register("author", "author@example.com").await;
        let (status, _, body) = self
            .send(json_request(
                "POST",
                "/api/v1/users/login",
                None,
                json!({"email": "author@example.com", "password": "very-secure-password"}),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"]
            .as_str()
            .expect("token must be present")
            .to_string()
    }
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request must build")
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request must build")
}

/// `(name, filename, bytes)`; a filename marks a file part.
fn multipart_request(
    method: &str,
    uri: &str,
    token: &str,
    parts: &[(&str, Option<&str>, &[u8])],
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .expect("request must build")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = TestApp::new();
    let (status, _, body) = app.send(empty_request("GET", "/healthz", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn registering_same_email_twice_is_created_then_conflict() {
    let app = TestApp::new();

    let (first, body) = app.register("first_user", "same@example.com").await;
    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["email"], "same@example.com");
    assert!(body["data"]["user"].get("password").is_none());

    let (second, body) = app.register("second_user", "same@example.com").await;
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn register_reports_every_invalid_field() {
    let app = TestApp::new();
    let (status, body) = app.register("x", "not-an-email").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().expect("errors must be listed");
    assert_eq!(errors.len(), 2);
}

#[tokio::test]
async fn malformed_json_is_bad_request_envelope() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/users/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request must build");

    let (status, _, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn login_sets_strict_http_only_session_cookie() {
    let app = TestApp::new();
    app.register("author", "author@example.com").await;

    let (status, headers, body) = app
        .send(json_request(
            "POST",
            "/api/v1/users/login",
            None,
            json!({"email": "author@example.com", "password": "very-secure-password"}),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].is_string());
    let cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("session cookie must be set");
    assert!(cookie.starts_with("user-token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Secure"));
    assert!(cookie.contains("SameSite=Strict"));
}

#[tokio::test]
async fn login_failures_distinguish_unknown_user_and_wrong_password() {
    let app = TestApp::new();
    app.register("author", "author@example.com").await;

    let (unknown, _, _) = app
        .send(json_request(
            "POST",
            "/api/v1/users/login",
            None,
            json!({"email": "ghost@example.com", "password": "very-secure-password"}),
        ))
        .await;
    assert_eq!(unknown, StatusCode::NOT_FOUND);

    let (wrong, _, _) = app
        .send(json_request(
            "POST",
            "/api/v1/users/login",
            None,
            json!({"email": "author@example.com", "password": "wrong-password"}),
        ))
        .await;
    assert_eq!(wrong, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_route_without_token_asks_to_login() {
    let app = TestApp::new();
    let (status, _, body) = app.send(empty_request("GET", "/api/v1/users", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], TOKEN_MISSING_MESSAGE);
}

#[tokio::test]
async fn tampered_token_is_rejected_as_invalid() {
    let app = TestApp::new();
    let token = app.login_token().await;

    let mut bytes = token.into_bytes();
    let target = bytes.len() - 5;
    bytes[target] = if bytes[target] == b'a' { b'b' } else { b'a' };
    let tampered = String::from_utf8(bytes).expect("token is ascii");

    let (status, _, body) = app
        .send(empty_request("GET", "/api/v1/users", Some(&tampered)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], TOKEN_INVALID_MESSAGE);
}

#[tokio::test]
async fn session_cookie_grants_access() {
    let app = TestApp::new();
    let token = app.login_token().await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/users")
        .header(header::COOKIE, format!("user-token={token}"))
        .body(Body::empty())
        .expect("request must build");

    let (status, _, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["users"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn logout_expires_session_cookie() {
    let app = TestApp::new();
    let token = app.login_token().await;

    let (status, headers, body) = app
        .send(empty_request("POST", "/api/v1/users/logout", Some(&token)))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("removal cookie must be set");
    assert!(cookie.starts_with("user-token="));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn profile_update_changes_only_sent_fields() {
    let app = TestApp::new();
    let token = app.login_token().await;

    let (status, _, body) = app
        .send(json_request(
            "PUT",
            "/api/v1/users/update",
            Some(&token),
            json!({"username": "renamed_author"}),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["username"], "renamed_author");
    assert_eq!(body["data"]["user"]["email"], "author@example.com");
}

#[tokio::test]
async fn malformed_id_is_rejected_before_lookup() {
    let app = TestApp::new();
    let token = app.login_token().await;

    let (status, _, body) = app
        .send(empty_request("GET", "/api/v1/blogs/not-an-id", None))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _, _) = app
        .send(empty_request("DELETE", "/api/v1/files/12345", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blog_lifecycle_over_http() {
    let app = TestApp::new();
    let token = app.login_token().await;

    let (status, _, body) = app
        .send(json_request(
            "POST",
            "/api/v1/blogs",
            Some(&token),
            json!({
                "title": "Hello World!",
                "category": "Rust",
                "description": "First post",
                "shortDescription": "hi"
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["blog"]["id"]
        .as_str()
        .expect("id must be present")
        .to_string();
    assert_eq!(body["data"]["blog"]["category"], "rust");
    assert_eq!(body["data"]["blog"]["shortDescription"], "hi");

    let uri = format!("/api/v1/blogs/{id}");
    app.send(empty_request("GET", &uri, None)).await;
    let (status, _, body) = app.send(empty_request("GET", &uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["blog"]["title"], "Hello World!");
    assert_eq!(body["data"]["blog"]["views"], 2);

    let (status, _, body) = app.send(empty_request("GET", "/api/v1/blogs", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalBlogs"], 1);
    assert_eq!(body["data"]["totalPages"], 1);
    assert_eq!(body["data"]["currentPage"], 1);
    assert_eq!(body["data"]["limit"], 10);

    let (status, _, body) = app.send(empty_request("DELETE", &uri, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["blog"]["id"], id.as_str());

    let (status, _, _) = app.send(empty_request("DELETE", &uri, Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blog_without_title_and_description_lists_both() {
    let app = TestApp::new();
    let token = app.login_token().await;

    let (status, _, body) = app
        .send(json_request("POST", "/api/v1/blogs", Some(&token), json!({})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn junk_pagination_falls_back_to_defaults() {
    let app = TestApp::new();
    let (status, _, body) = app
        .send(empty_request("GET", "/api/v1/blogs?page=abc&limit=-5", None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["currentPage"], 1);
    assert_eq!(body["data"]["limit"], 10);
    assert_eq!(body["data"]["totalPages"], 0);
}

#[tokio::test]
async fn multipart_blog_uses_uploaded_image() {
    let app = TestApp::new();
    let token = app.login_token().await;

    let (status, _, body) = app
        .send(multipart_request(
            "POST",
            "/api/v1/blogs",
            &token,
            &[
                ("title", None, b"Blog with cover".as_slice()),
                ("description", None, b"Has an image".as_slice()),
                ("image", Some("cover.png"), [1u8, 2, 3, 4].as_slice()),
            ],
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["data"]["blog"]["img"],
        "https://media.example.com/portfolio-uploads/0-cover.png"
    );
    assert_eq!(app.media.uploads().len(), 1);
}

#[tokio::test]
async fn file_upload_list_and_delete() {
    let app = TestApp::new();
    let token = app.login_token().await;

    let (status, _, body) = app
        .send(multipart_request(
            "POST",
            "/api/v1/files/upload",
            &token,
            &[
                ("file", Some("cv.pdf"), b"%PDF-1.4".as_slice()),
                ("title", None, b"Resume".as_slice()),
            ],
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["file"]["resourceType"], "raw");
    let id = body["data"]["file"]["id"]
        .as_str()
        .expect("id must be present")
        .to_string();

    let (status, _, body) = app.send(empty_request("GET", "/api/v1/files", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 1);

    let (status, _, _) = app
        .send(empty_request("DELETE", &format!("/api/v1/files/{id}"), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.media.destroyed().len(), 1);
}

#[tokio::test]
async fn file_upload_without_file_part_is_bad_request() {
    let app = TestApp::new();
    let token = app.login_token().await;

    let (status, _, body) = app
        .send(multipart_request(
            "POST",
            "/api/v1/files/upload",
            &token,
            &[("title", None, b"No attachment".as_slice())],
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn snake_case_short_description_is_accepted_and_validated() {
    let app = TestApp::new();
    let token = app.login_token().await;

    let (status, _, body) = app
        .send(json_request(
            "POST",
            "/api/v1/blogs",
            Some(&token),
            json!({
                "title": "Snake case fields",
                "description": "body",
                "short_description": "hi"
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["blog"]["shortDescription"], "hi");

    let (status, _, body) = app
        .send(json_request(
            "POST",
            "/api/v1/blogs",
            Some(&token),
            json!({
                "title": "Too long summary",
                "description": "body",
                "short_description": "x".repeat(300)
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn repeated_pagination_key_uses_first_value() {
    let app = TestApp::new();
    let (status, _, body) = app
        .send(empty_request("GET", "/api/v1/blogs?page=1&page=2&limit=5&limit=7", None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["currentPage"], 1);
    assert_eq!(body["data"]["limit"], 5);
}

#[tokio::test]
async fn json_body_on_upload_route_gets_error_envelope() {
    let app = TestApp::new();
    let token = app.login_token().await;

    let (status, _, body) = app
        .send(json_request(
            "POST",
            "/api/v1/files/upload",
            Some(&token),
            json!({"title": "not multipart"}),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    assert!(app.media.uploads().is_empty());
}

#[tokio::test]
async fn landing_page_is_html() {
    let app = TestApp::new();
    let response = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/", None))
        .await
        .expect("router must respond");

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body must be readable");
    assert!(String::from_utf8_lossy(&body).contains("Portfolio API"));
}
