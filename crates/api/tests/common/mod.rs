//! Shared helpers for API integration tests.
//!
//! Builds the full application router with the production middleware
//! stack, stub external adapters, and a real database pool.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;

use herdscan_api::auth::jwt::{generate_access_token, JwtConfig};
use herdscan_api::config::{ServerConfig, StorageConfig};
use herdscan_api::router::build_app_router;
use herdscan_api::state::AppState;
use herdscan_core::prediction::{normalize_predictions, Prediction};
use herdscan_db::models::user::CreateUser;
use herdscan_db::repositories::UserRepo;
use herdscan_inference::{Classifier, InferenceError};
use herdscan_pipeline::location::NullLocationResolver;
use herdscan_storage::{ArtifactStore, StorageError};

/// PNG file header; enough for format probing.
pub const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Multipart boundary used by the body builders below.
pub const BOUNDARY: &str = "herdscan-test-boundary";

// ---------------------------------------------------------------------------
// Stub adapters
// ---------------------------------------------------------------------------

/// Classifier stub answering with a fixed Gir/Sahiwal ranking.
pub struct StubClassifier;

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<Vec<Prediction>, InferenceError> {
        Ok(normalize_predictions(vec![
            ("Sahiwal".to_string(), 10.1),
            ("Gir".to_string(), 82.3),
        ])
        .unwrap())
    }
}

/// In-memory artifact store.
pub struct StubStore {
    pub uploads: Mutex<Vec<String>>,
}

impl StubStore {
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ArtifactStore for StubStore {
    async fn upload(
        &self,
        key: &str,
        _bytes: &[u8],
        _content_type: &str,
    ) -> Result<String, StorageError> {
        self.uploads.lock().unwrap().push(key.to_string());
        Ok(self.public_url(key))
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.test/{key}")
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .uploads
            .lock()
            .unwrap()
            .iter()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        classifier_url: "http://localhost:8500/classify".to_string(),
        classifier_timeout_secs: 20,
        storage: StorageConfig::Local {
            base_dir: "./media".to_string(),
            public_base_url: "https://cdn.test".to_string(),
        },
        location_url: None,
        location_timeout_secs: 5,
    }
}

/// Build the full application router with stub adapters and the
/// production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        classifier: Arc::new(StubClassifier),
        artifacts: Arc::new(StubStore::new()),
        location: Arc::new(NullLocationResolver),
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Seed a user with the given role and return a Bearer header value for it.
pub async fn seed_user_with_token(pool: &PgPool, name: &str, role: &str) -> (i64, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            display_name: name.to_string(),
            role: Some(role.to_string()),
        },
    )
    .await
    .unwrap();

    let token = generate_access_token(user.id, role, &test_config().jwt).unwrap();
    (user.id, format!("Bearer {token}"))
}

/// Build a JSON request.
pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build a bodiless request.
pub fn bare_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}

/// Build a multipart submission body with one `image` field.
pub fn image_upload_request(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();
    push_file_field(&mut body, "image", "cow.png", PNG_MAGIC);
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    multipart_request(uri, auth, body)
}

/// Build a bulk-import body: a `breed_name` text field plus `count`
/// image files under the repeated `images` field.
pub fn bulk_import_request(uri: &str, auth: Option<&str>, breed: &str, count: usize) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"breed_name\"\r\n\r\n{breed}\r\n"
        )
        .as_bytes(),
    );
    for i in 0..count {
        push_file_field(&mut body, "images", &format!("ref-{i}.png"), PNG_MAGIC);
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    multipart_request(uri, auth, body)
}

fn push_file_field(body: &mut Vec<u8>, name: &str, filename: &str, bytes: &[u8]) {
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");
}

fn multipart_request(uri: &str, auth: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"));
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
