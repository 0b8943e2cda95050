use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use sentisage::fetch::fetch_model;
use tokio::net::TcpListener;

const BODY: &str = r#"{"kind": "multinomial_nb"}"#;

async fn spawn_origin() -> String {
    let app = Router::new()
        .route("/model.json", get(|| async { BODY }))
        .route("/gone.json", get(|| async { StatusCode::NOT_FOUND }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn writes_artifact_creating_parent_dirs() {
    let origin = spawn_origin().await;
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("model/sentiment_analysis_model.json");

    let written = fetch_model(&format!("{origin}/model.json"), &dest, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(written, BODY.len() as u64);
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), BODY);
}

#[tokio::test]
async fn http_error_fails_without_writing() {
    let origin = spawn_origin().await;
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("model.json");

    let result = fetch_model(&format!("{origin}/gone.json"), &dest, Duration::from_secs(5)).await;

    assert!(result.is_err());
    assert!(!dest.exists());
}
