#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use snbp::auth::{PasswordHasher, SessionKeys};
use snbp::error::Result;
use snbp::notify::{Notifier, SelectionEmail};
use snbp::server::{AppState, create_router};
use snbp::store::{SqliteStore, Store};
use snbp::types::Role;

pub const PASSWORD: &str = "rahasia123";
pub const PUBLIC_URL: &str = "https://snbp.sekolah.test";

/// Keeps every message it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SelectionEmail>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SelectionEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Dispatch is asynchronous, so poll until `count` messages arrived.
    pub async fn wait_for(&self, count: usize) -> Vec<SelectionEmail> {
        for _ in 0..100 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("expected {count} notification(s), got {}", self.sent().len());
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, email: &SelectionEmail) -> Result<()> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        if self.text.is_empty() {
            return Value::Null;
        }
        serde_json::from_str(&self.text).unwrap_or_else(|e| panic!("invalid JSON {e}: {}", self.text))
    }
}

pub struct TestApp {
    _temp_dir: TempDir,
    pub store: Arc<SqliteStore>,
    pub notifier: Arc<RecordingNotifier>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = Arc::new(SqliteStore::new(temp_dir.path().join("snbp.db")).expect("open store"));
        store.initialize().expect("initialize store");

        let notifier = Arc::new(RecordingNotifier::default());
        let sessions = SessionKeys::new("test-secret", chrono::Duration::hours(2));
        let state = AppState::new(store.clone(), sessions, notifier.clone())
            .with_public_url(Some(PUBLIC_URL.to_string()));

        Self {
            _temp_dir: temp_dir,
            store,
            notifier,
            router: create_router(Arc::new(state)),
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            text: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let resp = self.send(Method::GET, uri, token, None).await;
        (resp.status, resp.json())
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let resp = self.send(Method::POST, uri, token, Some(body)).await;
        (resp.status, resp.json())
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let resp = self.send(Method::PUT, uri, token, Some(body)).await;
        (resp.status, resp.json())
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let resp = self.send(Method::PATCH, uri, token, Some(body)).await;
        (resp.status, resp.json())
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let resp = self.send(Method::DELETE, uri, token, None).await;
        (resp.status, resp.json())
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/auth/login",
                None,
                json!({"email": email, "password": password}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token").to_string()
    }

    /// Self-registers a student account and returns its token.
    pub async fn student(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/auth/register",
                None,
                json!({"email": email, "password": PASSWORD}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        self.login(email, PASSWORD).await
    }

    /// Provisions a staff account directly in the store, the way the admin CLI does.
    pub async fn staff(&self, email: &str, role: Role) -> String {
        let hash = PasswordHasher::new().hash(PASSWORD).unwrap();
        self.store.create_user(email, &hash, role).unwrap();
        self.login(email, PASSWORD).await
    }

    pub async fn save_profile(&self, token: &str, nama: &str, tanggal_lahir: &str) {
        let (status, body) = self
            .post(
                "/profil/siswa",
                Some(token),
                json!({
                    "nama": nama,
                    "nisn": "0071234567",
                    "sekolah": "SMA Negeri 1 Bandung",
                    "tanggalLahir": tanggal_lahir,
                    "kabupaten": "Kota Bandung",
                    "provinsi": "Jawa Barat",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "save profile failed: {body}");
    }

    pub async fn add_grade(&self, token: &str, semester: i64, subject: &str, score: f64) -> i64 {
        let (status, body) = self
            .post(
                "/profil/nilai",
                Some(token),
                json!({"semester": semester, "mataPelajaran": subject, "nilai": score}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add grade failed: {body}");
        body["data"]["id"].as_i64().unwrap()
    }

    pub async fn register_programs(
        &self,
        token: &str,
        prodi1: &str,
        prodi2: Option<&str>,
    ) -> Value {
        let (status, body) = self
            .post(
                "/pendaftaran",
                Some(token),
                json!({"prodi1": prodi1, "prodi2": prodi2}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
        body["data"].clone()
    }

    pub fn user_id(&self, email: &str) -> i64 {
        self.store.get_user_by_email(email).unwrap().unwrap().id
    }
}
