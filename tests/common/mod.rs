use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use portfolio_contact::config::{Config, SmtpConfig};
use portfolio_contact::db::{StoreError, SubmissionStore};
use portfolio_contact::email::{Delivery, Notifier, NotifyError};
use portfolio_contact::models::{NewSubmission, Submission};

/// In-memory store that can be switched into a failing mode.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Submission>>,
    fail: AtomicBool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        let store = Self::default();
        store.fail.store(true, Ordering::SeqCst);
        store
    }

    pub fn records(&self) -> Vec<Submission> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn create(&self, new: &NewSubmission) -> Result<Submission, StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::from("connection refused"));
        }

        let now = Utc::now();
        let submission = Submission {
            id: Uuid::now_v7(),
            name: new.name.clone(),
            email: new.email.clone(),
            message: new.message.clone(),
            created_at: now,
            updated_at: now,
        };
        self.records.lock().unwrap().push(submission.clone());
        Ok(submission)
    }
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Notifier that records every call and optionally fails it.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMail>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.fail.store(true, Ordering::SeqCst);
        notifier
    }

    pub fn calls(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        recipients: &[String],
        subject: &str,
        html_body: &str,
    ) -> Result<Delivery, NotifyError> {
        self.sent.lock().unwrap().push(SentMail {
            recipients: recipients.to_vec(),
            subject: subject.to_string(),
            body: html_body.to_string(),
        });

        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::from("Connection timed out"));
        }

        Ok(Delivery {
            response: "250 2.0.0 OK".to_string(),
        })
    }
}

/// A running test server backed by substitute gateways.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST a JSON contact form, return (body, status).
    pub async fn submit(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/contact"))
            .json(data)
            .send()
            .await
            .expect("submit request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// POST a form-urlencoded contact form, return (body, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/contact"))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub struct TestOptions {
    pub store: MemoryStore,
    pub notifier: Option<RecordingNotifier>,
    pub recipients: Vec<String>,
    pub max_body_size: usize,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            store: MemoryStore::default(),
            notifier: Some(RecordingNotifier::default()),
            recipients: vec!["owner@portfolio.dev".to_string(), "bot@gmail.com".to_string()],
            max_body_size: 102_400,
        }
    }
}

pub fn test_config(recipients: Vec<String>, max_body_size: usize) -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        database_connect_timeout: Duration::from_secs(1),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size,
        log_level: "warn".to_string(),
        smtp: None,
        recipients,
    }
}

/// Spawn the app with default options: working store, working notifier,
/// two recipients.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(TestOptions::default()).await
}

pub async fn spawn_app_with(options: TestOptions) -> TestApp {
    let store = Arc::new(options.store);
    let has_notifier = options.notifier.is_some();
    let notifier = Arc::new(options.notifier.unwrap_or_default());

    let app = portfolio_contact::build_app(
        test_config(options.recipients, options.max_body_size),
        store.clone(),
        has_notifier.then(|| notifier.clone() as Arc<dyn Notifier>),
    );

    serve(app, store, notifier).await
}

/// Spawn the app with the real SMTP notifier built from `smtp`. The
/// returned `notifier` is unused.
pub async fn spawn_app_with_smtp(smtp: SmtpConfig, recipients: Vec<String>) -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let mut config = test_config(recipients, 102_400);
    config.smtp = Some(smtp);

    let smtp_notifier = portfolio_contact::build_notifier(&config);
    assert!(smtp_notifier.is_some(), "SMTP notifier was not built");

    let app = portfolio_contact::build_app(config, store.clone(), smtp_notifier);
    serve(app, store, Arc::new(RecordingNotifier::default())).await
}

async fn serve(
    app: axum::Router,
    store: Arc<MemoryStore>,
    notifier: Arc<RecordingNotifier>,
) -> TestApp {
    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        store,
        notifier,
    }
}
