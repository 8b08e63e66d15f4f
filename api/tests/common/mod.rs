//! Shared fixtures for the API integration tests
#![allow(dead_code)]

use std::fmt::Debug;
use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use sefr_api::AppState;
use sefr_core::repositories::{MemoryStore, UserRepository};
use sefr_core::services::{MailTransport, ManualClock, ScriptedDigitSource};
use sefr_infra::{InfrastructureServices, LogMailTransport};
use sefr_shared::AppConfig;
use serde_json::{json, Value};

/// Every issued code is `123456` unless a test scripts otherwise
pub const CODE: &str = "123456";
pub const PASSWORD: &str = "correct-horse-42";

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<LogMailTransport>,
    pub users: Arc<dyn UserRepository>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with(AppConfig::testing(), CODE)
    }

    pub fn with(config: AppConfig, digits: &str) -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let store = Arc::new(MemoryStore::new());
        let mut infra = InfrastructureServices::in_memory(store.clone(), clock.clone());

        let mailer = Arc::new(LogMailTransport::new());
        let transport: Arc<dyn MailTransport> = mailer.clone();
        infra.mailer = transport;

        let users = infra.repositories.users.clone();
        let state = web::Data::new(AppState::build(
            config,
            &infra,
            clock.clone(),
            Arc::new(ScriptedDigitSource::new(digits)),
        ));

        Self {
            state,
            clock,
            store,
            mailer,
            users,
        }
    }

    /// Promote an existing account to staff
    pub async fn make_staff(&self, email: &str) {
        let mut user = self
            .users
            .find_by_email(email)
            .await
            .expect("store available")
            .expect("user exists");
        user.is_staff = true;
        self.users.update(user).await.expect("update staff flag");
    }
}

/// Send a request and decode the JSON body (`Null` when empty)
pub async fn send<S, R, B, E>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = E>,
    B: MessageBody,
    E: Debug,
{
    let response = test::call_service(app, req).await;
    let status = response.status();
    let body = test::read_body(response).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("response body is JSON")
    };
    (status, json)
}

pub fn register_body(email: &str, username: Option<&str>) -> Value {
    let mut body = json!({
        "email": email,
        "password": PASSWORD,
        "first_name": "Sara",
        "last_name": "Ahmadi",
    });
    if let Some(username) = username {
        body["username"] = json!(username);
    }
    body
}

pub fn post_json(uri: &str, body: &Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Register and verify an account, returning its access and refresh tokens
pub async fn verified_account<S, B, E>(app: &S, email: &str, username: &str) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = E>,
    B: MessageBody,
    E: Debug,
{
    let (status, _) = send(
        app,
        post_json("/api/auth/register/", &register_body(email, Some(username)))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        post_json("/api/auth/verify-email/", &json!({ "email": email, "code": CODE }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "verify failed: {}", body);

    (
        body["access"].as_str().expect("access token").to_string(),
        body["refresh"].as_str().expect("refresh token").to_string(),
    )
}
