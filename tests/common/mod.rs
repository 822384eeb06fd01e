//! Shared fixtures for the HTTP integration tests.
//!
//! Each test gets a fresh in-memory SQLite database with migrations applied
//! and a transport that records messages instead of sending them.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use alarma_server::{
    alarm::AlarmService,
    api,
    migrator::Migrator,
    notifications::{MessageTransport, Notifier, TransportError},
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

pub const SENDER: &str = "+15550001111";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub from: String,
    pub to: String,
    pub body: String,
}

/// Records every message. Recipients listed in `failing` get a provider error.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<SentMessage>>,
    pub failing: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn fail_for(&self, to: &str) {
        self.failing.lock().unwrap().push(to.to_string());
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<String, TransportError> {
        self.sent.lock().unwrap().push(SentMessage {
            from: from.to_string(),
            to: to.to_string(),
            body: body.to_string(),
        });
        if self.failing.lock().unwrap().iter().any(|f| f == to) {
            return Err(TransportError::Provider("21211 invalid 'To' number".into()));
        }
        Ok(format!("SM{:04}", self.sent.lock().unwrap().len()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub transport: Arc<RecordingTransport>,
}

pub async fn create_test_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    // One connection: every query must see the same in-memory database.
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn create_test_app() -> TestApp {
    let db = create_test_db().await;
    let transport = Arc::new(RecordingTransport::default());
    let notifier = Notifier::new(transport.clone(), SENDER);
    let service = AlarmService::new(db.clone(), notifier);

    TestApp {
        router: api::router(service),
        db,
        transport,
    }
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!("Failed to parse response body: {:?}", String::from_utf8_lossy(&body))
    })
}
