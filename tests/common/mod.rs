//! Shared helpers for router-level tests.

#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use court_booking::config::AppConfig;
use court_booking::domain::MemberRole;
use court_booking::infrastructure::{create_token, JwtConfig};
use court_booking::server::AppComponents;
use court_booking::create_api_router;

pub struct TestApp {
    pub router: Router,
    pub config: AppConfig,
    pub jwt: JwtConfig,
    _dir: TempDir,
}

pub fn config_in(dir: &Path) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.storage.data_dir = dir.to_path_buf();
    cfg.storage.lock_timeout_ms = 2000;
    cfg.storage.lock_retry_interval_ms = 5;
    cfg.security.jwt_secret = "integration-secret".into();
    cfg
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(tweak: impl FnOnce(&mut AppConfig)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config_in(dir.path());
        tweak(&mut cfg);

        let components = AppComponents::build(&cfg, None).await.unwrap();
        let jwt = components.api.jwt_config.clone();
        Self {
            router: create_api_router(components.api),
            config: cfg,
            jwt,
            _dir: dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.storage.data_dir
    }

    pub fn token(&self, member_id: &str, role: MemberRole) -> String {
        create_token(member_id, role, &self.jwt).unwrap()
    }

    pub fn admin_token(&self) -> String {
        self.token("admin-1", MemberRole::Admin)
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(json) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body), None).await
    }

    /// Create a member through the API as admin and return its id.
    pub async fn create_member(&self, email: &str) -> String {
        let admin = self.admin_token();
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/members",
                Some(serde_json::json!({
                    "firstName": "Test",
                    "lastName": "Player",
                    "email": email,
                })),
                Some(&admin),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}

pub fn guest_booking(court: &str, date: &str, start: &str, end: &str) -> Value {
    serde_json::json!({
        "courtId": court,
        "date": date,
        "timeSlot": {"start": start, "end": end},
        "guestName": "Jane Guest",
        "guestEmail": "jane@example.com",
        "guestPhone": "+1 555 0100",
    })
}

/// The slot entry for `court`/`start` in an availability response.
pub fn slot_available(availability: &Value, court: &str, start: &str) -> bool {
    availability["availability"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["courtId"] == court)
        .unwrap()["slots"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["start"] == start)
        .unwrap()["available"]
        .as_bool()
        .unwrap()
}
