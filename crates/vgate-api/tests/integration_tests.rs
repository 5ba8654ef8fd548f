//! # Integration Tests for vgate-api
//!
//! Drives the full router with `oneshot`: health probes, schema listing,
//! named and inline validation, and failure rendering.

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use vgate_api::bootstrap::bootstrap;
use vgate_api::state::AppConfig;
use vgate_schema::ValidationConfig;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

/// Helper: schema root with `user/create` and `user/address`.
fn schema_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "user/create.schema.json",
        r#"{"type":"object","required":["name"],"properties":{"name":{"type":"string"}}}"#,
    );
    write(
        dir.path(),
        "user/address.schema.yaml",
        "type: object\nrequired: [city]\n",
    );
    dir
}

/// Helper: build the test app over `root`.
fn test_app(root: &Path, fail_status: Option<u16>) -> axum::Router {
    let config = AppConfig {
        validation: ValidationConfig {
            schema_paths: vec![root.to_path_buf()],
            fail_status,
            ..ValidationConfig::default()
        },
        ..AppConfig::default()
    };
    vgate_api::app(bootstrap(config).unwrap())
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let root = schema_root();
    let response = test_app(root.path(), None)
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let root = schema_root();
    let response = test_app(root.path(), None)
        .oneshot(
            Request::builder()
                .uri("/health/readiness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Schema Listing -----------------------------------------------------------

#[tokio::test]
async fn test_list_schemas_sorted() {
    let root = schema_root();
    let response = test_app(root.path(), None)
        .oneshot(
            Request::builder()
                .uri("/v1/schemas")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({"schemas": ["user/address", "user/create"]}));
}

// -- Named Validation ---------------------------------------------------------

#[tokio::test]
async fn test_named_validation_passes() {
    let root = schema_root();
    let response = test_app(root.path(), None)
        .oneshot(post_json("/v1/schemas/validate/user/create", r#"{"name":"a"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_named_validation_failure_rendered() {
    let root = schema_root();
    let response = test_app(root.path(), None)
        .oneshot(post_json("/v1/schemas/validate/user/create", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], 100);
    assert_eq!(body["error"]["message"], "validate error");
    let data = body["error"]["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["keyword"], "required");
    assert!(data[0]["message"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_fail_status_override() {
    let root = schema_root();
    let response = test_app(root.path(), Some(400))
        .oneshot(post_json("/v1/schemas/validate/user/address", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], 100);
}

#[tokio::test]
async fn test_unknown_schema_is_internal_error() {
    let root = schema_root();
    let response = test_app(root.path(), None)
        .oneshot(post_json("/v1/schemas/validate/user/delete", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_string(response).await;
    assert!(!body.contains("user/delete"), "details leaked: {body}");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let root = schema_root();
    let response = test_app(root.path(), None)
        .oneshot(post_json("/v1/schemas/validate/user/create", "{\"name\":"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], 400);
}

// -- Inline Validation --------------------------------------------------------

#[tokio::test]
async fn test_inline_validation() {
    let root = schema_root();
    let app = test_app(root.path(), None);

    let ok = app
        .clone()
        .oneshot(post_json(
            "/v1/validate",
            r#"{"schema":{"type":"integer","minimum":1},"data":5}"#,
        ))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::NO_CONTENT);

    let fail = app
        .oneshot(post_json(
            "/v1/validate",
            r#"{"schema":{"type":"integer","minimum":1},"data":0}"#,
        ))
        .await
        .unwrap();
    assert_eq!(fail.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(fail).await;
    assert_eq!(body["error"]["data"][0]["keyword"], "minimum");
}

#[tokio::test]
async fn test_inline_request_may_name_a_schema() {
    let root = schema_root();
    let response = test_app(root.path(), None)
        .oneshot(post_json(
            "/v1/validate",
            r#"{"schema":"user/address","data":{"city":"Oslo"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_inline_unknown_name_is_not_found() {
    let root = schema_root();
    let response = test_app(root.path(), None)
        .oneshot(post_json("/v1/validate", r#"{"schema":"nope","data":{}}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inline_invalid_schema_is_bad_request() {
    let root = schema_root();
    let response = test_app(root.path(), None)
        .oneshot(post_json(
            "/v1/validate",
            r#"{"schema":{"type":"nonsense"},"data":1}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
