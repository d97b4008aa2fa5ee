//! Router round-trips through `tower::ServiceExt::oneshot`: status codes,
//! headers, and streamed bodies.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use ferry_server::routes::{AppState, router};
use ferry_streamer::FileStreamer;

fn test_state(root: &Path) -> AppState {
    let mut streamer = FileStreamer::new();
    streamer.set_throttle(Duration::ZERO, 8192);
    AppState {
        root: root.to_path_buf(),
        streamer: Arc::new(streamer),
        attachment: true,
    }
}

fn test_data(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_range(uri: &str, range: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::RANGE, range)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn full_download_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let data = test_data(40_000);
    std::fs::write(dir.path().join("blob.bin"), &data).unwrap();

    let response = router(test_state(dir.path()))
        .oneshot(get("/files/blob.bin"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "40000");
    assert_eq!(response.headers()[header::ACCEPT_RANGES], "bytes");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"blob.bin\""
    );
    assert_eq!(
        response.headers()[header::EXPIRES],
        "Mon, 26 Jul 1997 05:00:00 GMT"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], &data[..]);
}

#[tokio::test]
async fn ranged_download_returns_partial_content() {
    let dir = tempfile::tempdir().unwrap();
    let data = test_data(1000);
    std::fs::write(dir.path().join("blob.bin"), &data).unwrap();

    let response = router(test_state(dir.path()))
        .oneshot(get_with_range("/files/blob.bin", "bytes=100-199"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers()[header::CONTENT_RANGE],
        "bytes 100-199/1000"
    );
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "100");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], &data[100..=199]);
}

#[tokio::test]
async fn missing_file_is_404() {
    let dir = tempfile::tempdir().unwrap();

    let response = router(test_state(dir.path()))
        .oneshot(get("/files/nope.bin"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn range_past_eof_is_416() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("small.bin"), test_data(100)).unwrap();

    let response = router(test_state(dir.path()))
        .oneshot(get_with_range("/files/small.bin", "bytes=5000-"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
}

#[tokio::test]
async fn path_traversal_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    let response = router(test_state(dir.path()))
        .oneshot(get("/files/..%2Fescape.bin"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_endpoint_answers() {
    let dir = tempfile::tempdir().unwrap();

    let response = router(test_state(dir.path()))
        .oneshot(get("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}
