//! Shared test helpers: an application over an in-memory store, seeded
//! users, token minting, and a mailer that records what it was asked to send.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use studioflow_api::Application;
use studioflow_auth::jwt::JwtEncoder;
use studioflow_core::config::AppConfig;
use studioflow_core::error::AppError;
use studioflow_core::result::AppResult;
use studioflow_core::traits::Mailer;
use studioflow_core::types::UserId;
use studioflow_database::{MemoryStore, Stores};
use studioflow_entity::user::{User, UserRole};

/// Records every email instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_email(&self, address: &str, template: &str, _data: &Value) -> AppResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((address.to_string(), template.to_string()));
        Ok(())
    }
}

/// Rejects every email.
#[derive(Debug, Default)]
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send_email(&self, _: &str, _: &str, _: &Value) -> AppResult<()> {
        Err(AppError::external_service("relay unavailable"))
    }
}

/// Test application wrapper.
pub struct TestApp {
    pub app: Application,
    pub router: Router,
    pub stores: Stores,
    encoder: JwtEncoder,
    pub admin: User,
    pub client: User,
    pub talent: User,
    pub outsider: User,
}

/// HTTP response captured for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// The `data` payload of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// `data.id` as a string.
    pub fn id(&self) -> String {
        self.body["data"]["id"].as_str().unwrap().to_string()
    }
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.worker.enabled = false;
    config.notifications.dispatch_workers = 2;
    config.notifications.queue_capacity = 64;
    config
}

impl TestApp {
    /// Application with a recording mailer.
    pub async fn new() -> (Self, Arc<RecordingMailer>) {
        let mailer = Arc::new(RecordingMailer::default());
        let app = Self::with_mailer(mailer.clone()).await;
        (app, mailer)
    }

    /// Application with the given mailer and four seeded users.
    pub async fn with_mailer(mailer: Arc<dyn Mailer>) -> Self {
        let config = test_config();
        let encoder = JwtEncoder::new(&config.auth);
        let stores = Stores::memory(Arc::new(MemoryStore::new()));

        let admin = seed_user(&stores, "admin@studio.test", "Avery", UserRole::Admin).await;
        let client = seed_user(&stores, "client@studio.test", "Casey", UserRole::Client).await;
        let talent = seed_user(&stores, "talent@studio.test", "Tam", UserRole::Talent).await;
        let outsider = seed_user(&stores, "other@studio.test", "Oli", UserRole::Talent).await;

        let app = Application::build(config, stores.clone(), mailer)
            .await
            .expect("application should build");
        let router = app.router();

        Self {
            app,
            router,
            stores,
            encoder,
            admin,
            client,
            talent,
            outsider,
        }
    }

    /// Signed token for `user`.
    pub fn token(&self, user: &User) -> String {
        self.encoder
            .encode(user.id, &user.email, user.role)
            .expect("token should encode")
    }

    /// Sends a request through the router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        as_user: Option<&User>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(user) = as_user {
            builder = builder.header("authorization", format!("Bearer {}", self.token(user)));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Creates a project owned by the seeded client with the seeded talent
    /// as primary talent, and returns its ID.
    pub async fn create_project(&self, title: &str) -> String {
        let res = self
            .request(
                "POST",
                "/api/projects",
                Some(serde_json::json!({
                    "title": title,
                    "talent_id": self.talent.id,
                })),
                Some(&self.client),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        res.id()
    }

    /// Creates a deliverable under `project_id` and returns its ID.
    pub async fn create_deliverable(&self, project_id: &str, title: &str) -> String {
        let res = self
            .request(
                "POST",
                &format!("/api/projects/{project_id}/deliverables"),
                Some(serde_json::json!({ "title": title })),
                Some(&self.client),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        res.id()
    }

    /// Polls until `user` has at least `count` notifications, returning them.
    pub async fn wait_for_notifications(&self, user: &User, count: usize) -> Vec<Value> {
        for _ in 0..200 {
            let res = self
                .request("GET", "/api/notifications", None, Some(user))
                .await;
            let items = res.data().as_array().cloned().unwrap_or_default();
            if items.len() >= count {
                return items;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for {count} notifications");
    }

    /// Drains every queued event and in-flight email.
    pub async fn finish(self) {
        self.app.shutdown().await;
    }
}

async fn seed_user(stores: &Stores, email: &str, name: &str, role: UserRole) -> User {
    let user = User {
        id: UserId::new(),
        email: email.to_string(),
        name: name.to_string(),
        role,
        created_at: chrono::Utc::now(),
    };
    stores.users.upsert(&user).await.unwrap();
    user
}
