//! End-to-end walk through the HTTP API: create, deposit, overdraw,
//! transfer, save, clear, load.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use bankledger_ledger::LedgerEngine;
use bankledger_server::{router, AppState};

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_banking_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("data").join("accounts.csv");
    let engine = Arc::new(LedgerEngine::default());
    let app = router(AppState::new(engine.clone(), snapshot.clone()));

    let (status, _) = call(&app, "POST", "/account", Some(json!({"name": "Alice", "balance": 100}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(&app, "POST", "/account/Alice/deposit", Some(json!({"amount": 50}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 150.0);

    let (_, alice) = call(&app, "GET", "/account/Alice", None).await;
    assert_eq!(alice["transactions"], json!(["Deposit: 50"]));

    let (status, _) = call(&app, "POST", "/account/Alice/withdraw", Some(json!({"amount": 200}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, alice) = call(&app, "GET", "/account/Alice", None).await;
    assert_eq!(alice["balance"], 150.0);

    let (status, _) = call(&app, "POST", "/account", Some(json!({"name": "Bob", "balance": 0}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call(
        &app,
        "POST",
        "/transfer",
        Some(json!({"from": "Alice", "to": "Bob", "amount": 150})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, "POST", "/save", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(snapshot.exists());

    engine.store().clear();
    let (status, _) = call(&app, "GET", "/account/Alice", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "POST", "/load", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, alice) = call(&app, "GET", "/account/Alice", None).await;
    let (_, bob) = call(&app, "GET", "/account/Bob", None).await;
    assert_eq!(alice["balance"], 0.0);
    assert_eq!(bob["balance"], 150.0);
    assert_eq!(
        alice["transactions"],
        json!(["Deposit: 50", "Transfer to Bob: 150"])
    );
    assert_eq!(bob["transactions"], json!(["Transfer from Alice: 150"]));
}

#[tokio::test]
async fn test_snapshot_file_format() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("accounts.csv");
    let app = router(AppState::new(Arc::new(LedgerEngine::default()), snapshot.clone()));

    call(&app, "POST", "/account", Some(json!({"name": "Carol", "balance": 12.5}))).await;
    call(&app, "POST", "/save", None).await;

    let contents = std::fs::read_to_string(&snapshot).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("account_id,name,balance,transactions"));

    let row = lines.next().unwrap();
    let fields: Vec<&str> = row.split(',').collect();
    assert_eq!(fields.len(), 4);
    assert_eq!(&fields[1..], &["Carol", "12.50", ""]);
    assert!(lines.next().is_none());
}
