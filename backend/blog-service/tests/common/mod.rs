//! Shared fixtures for the API integration tests
//!
//! Builds the real routing table over an in-memory store and mints tokens
//! with the fixed test key pair.
#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use blog_service::models::{Group, NewGroup, Post, PostFields, User};
use blog_service::{ApiSettings, AppState, EntityStore, InMemoryStore, SharedStore};
use crypto_core::jwt::{self, test_support::init_test_keys};
use serde_json::Value;
use std::sync::Arc;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub struct TestContext {
    pub store: Arc<InMemoryStore>,
}

impl TestContext {
    pub fn new() -> Self {
        init_test_keys();
        Self {
            store: Arc::new(InMemoryStore::new()),
        }
    }

    pub fn state(&self) -> web::Data<AppState> {
        self.state_with(ApiSettings::default())
    }

    pub fn state_with(&self, settings: ApiSettings) -> web::Data<AppState> {
        let store: SharedStore = self.store.clone();
        web::Data::new(AppState::new(store, settings))
    }

    pub async fn app(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
        self.app_with(ApiSettings::default()).await
    }

    pub async fn app_with(
        &self,
        settings: ApiSettings,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
        test::init_service(
            App::new()
                .app_data(self.state_with(settings))
                .configure(blog_service::configure_app),
        )
        .await
    }

    /// Register a user with `TEST_PASSWORD` and return it with a valid token
    pub async fn user(&self, username: &str) -> (User, String) {
        let hash = crypto_core::hash_password(TEST_PASSWORD).unwrap();
        let user = self.store.create_user(username, &hash).await.unwrap();
        let token =
            jwt::generate_access_token(user.id, &user.username, chrono::Duration::hours(1))
                .unwrap();
        (user, token)
    }

    pub async fn group(&self, slug: &str) -> Group {
        self.store
            .create_group(&NewGroup {
                title: format!("Group {slug}"),
                slug: slug.to_string(),
                description: String::new(),
            })
            .await
            .unwrap()
    }

    pub async fn post(&self, author: &User, text: &str) -> Post {
        self.store
            .create_post(
                author.id,
                &PostFields {
                    text: text.to_string(),
                    ..PostFields::default()
                },
            )
            .await
            .unwrap()
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Run a request and return its status and JSON body (`Null` when empty).
///
/// Errors raised by middleware are rendered the way the server would.
pub async fn send<S, B>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
            (status, json)
        }
        Err(err) => (err.as_response_error().status_code(), Value::Null),
    }
}
