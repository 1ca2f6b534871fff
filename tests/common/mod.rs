// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use tripboard_api::{
    config::Config,
    enrich::Enricher,
    fetch::PageFetcher,
    reconcile::{ReconcileEvent, Reconciler},
    store::InMemoryCardStore,
    AppState,
};

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryCardStore,
    pub events: mpsc::UnboundedReceiver<ReconcileEvent>,
}

pub fn test_app() -> TestApp {
    test_app_with(Config::default())
}

pub fn test_app_with(config: Config) -> TestApp {
    let enricher = Enricher::new(PageFetcher::new(&config).unwrap());
    let store = InMemoryCardStore::new();
    let (reconciler, events) = Reconciler::new(enricher.clone(), Arc::new(store.clone()));
    let router = tripboard_api::app(AppState {
        enricher,
        store: Arc::new(store.clone()),
        reconciler,
    });
    TestApp {
        router,
        store,
        events,
    }
}

/// Send a request and return the status with the body parsed as JSON
/// (`Value::Null` for an empty body).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body.to_string())).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

/// A listener that accepts connections and never answers them.
pub async fn stalled_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });
    format!("http://{}/", addr)
}
