//! API integration tests
//!
//! Tests for HTTP API endpoints using axum's test utilities.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use menagerie::config::Config;
use menagerie::records::RecordService;
use menagerie::server::{create_router, AppContext};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

const BOUNDARY: &str = "menagerie-test-boundary";

/// Create a router over a fresh data directory.
///
/// The directory must outlive the router, so it is returned alongside.
fn create_test_app() -> (Router, TempDir) {
    let dir = tempdir().unwrap();
    let mut config = Config::default();
    config.storage.data_dir = dir.path().to_path_buf();
    let records = RecordService::open(&config.storage).unwrap();
    let ctx = AppContext::new(config, records);
    (create_router(ctx, None), dir)
}

/// Helper to get response body as string
async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Build a multipart body by hand.
fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, data)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(method: Method, uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

const FIELDS: [(&str, &str); 6] = [
    ("name", "Bram"),
    ("kind", "Dwarf"),
    ("category", "Smith"),
    ("strengths", "Stubborn"),
    ("weaknesses", "Heights"),
    ("notes", "Owes the guild money"),
];

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _dir) = create_test_app();

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_empty() {
    let (app, _dir) = create_test_app();

    let response = app
        .oneshot(Request::get("/uploads-data").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_string(response.into_body()).await, "[]");
}

#[tokio::test]
async fn test_upload_and_list() {
    let (app, _dir) = create_test_app();

    let body = multipart_body(&FIELDS, Some(("bram.png", b"\x89PNGbram")));
    let response = app
        .clone()
        .oneshot(multipart_request(Method::POST, "/upload", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created: serde_json::Value =
        serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
    assert_eq!(created["name"], "Bram");
    assert_eq!(created["notes"], "Owes the guild money");

    let response = app
        .oneshot(Request::get("/uploads-data").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let list: Vec<serde_json::Value> =
        serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
    assert_eq!(list, vec![created]);
}

#[tokio::test]
async fn test_upload_lists_missing_fields() {
    let (app, _dir) = create_test_app();

    let body = multipart_body(&FIELDS[..4], None);
    let response = app
        .oneshot(multipart_request(Method::POST, "/upload", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let text = body_to_string(response.into_body()).await;
    assert!(text.contains("weaknesses"), "body: {text}");
    assert!(text.contains("notes"), "body: {text}");
    assert!(text.contains("image"), "body: {text}");
}

#[tokio::test]
async fn test_upload_empty_image_is_missing() {
    let (app, _dir) = create_test_app();

    let body = multipart_body(&FIELDS, Some(("empty.png", b"")));
    let response = app
        .oneshot(multipart_request(Method::POST, "/upload", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_invalid_id() {
    let (app, _dir) = create_test_app();

    let mut fields = vec![("id", "not-a-number")];
    fields.extend_from_slice(&FIELDS);
    let response = app
        .oneshot(multipart_request(
            Method::PUT,
            "/edit",
            multipart_body(&fields, None),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_without_id() {
    let (app, _dir) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri("/delete")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_method() {
    let (app, _dir) = create_test_app();

    let response = app
        .oneshot(Request::get("/upload").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _dir) = create_test_app();

    let response = app
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _dir) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/upload")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
