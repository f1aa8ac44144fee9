//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::util::ServiceExt;
use uuid::Uuid;

use volunteer_hub::domain::Role;
use volunteer_hub::repository::memory::InMemoryAccessTokenStore;
use volunteer_hub::repository::AccessToken;
use volunteer_hub::{build_router, AppState, ServiceSettings};

pub const MEMBER_TOKEN: &str = "member_token_123";
pub const SECOND_MEMBER_TOKEN: &str = "member_token_456";
pub const ORGANIZER_TOKEN: &str = "organizer_token_123";
pub const ADMIN_TOKEN: &str = "admin_token_123";
pub const EXPIRED_TOKEN: &str = "expired_token_123";

/// Connect to the test database and bring the schema up to date.
///
/// Tests share the database, so each one works on rows it creates with
/// fresh ids instead of truncating tables.
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// App wired to in-memory stores with one token per role
pub struct TestApp {
    pub router: Router,
    pub member_id: Uuid,
    pub second_member_id: Uuid,
    pub organizer_id: Uuid,
    pub admin_id: Uuid,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_settings(ServiceSettings::default())
    }

    pub fn with_settings(settings: ServiceSettings) -> Self {
        let tokens = Arc::new(InMemoryAccessTokenStore::new());

        let member_id = Uuid::new_v4();
        let second_member_id = Uuid::new_v4();
        let organizer_id = Uuid::new_v4();
        let admin_id = Uuid::new_v4();

        tokens.insert(MEMBER_TOKEN, token(member_id, Role::Member));
        tokens.insert(SECOND_MEMBER_TOKEN, token(second_member_id, Role::Member));
        tokens.insert(ORGANIZER_TOKEN, token(organizer_id, Role::Organizer));
        tokens.insert(ADMIN_TOKEN, token(admin_id, Role::Admin));
        tokens.insert(
            EXPIRED_TOKEN,
            AccessToken {
                expires_at: Some(Utc::now() - Duration::hours(1)),
                ..token(Uuid::new_v4(), Role::Member)
            },
        );

        let state = AppState::in_memory(tokens, settings);

        Self {
            router: build_router(state),
            member_id,
            second_member_id,
            organizer_id,
            admin_id,
        }
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty)
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Create a category as admin and return its id
    pub async fn create_category(&self, name: &str) -> Uuid {
        let (status, body) = self
            .send(
                "POST",
                "/api/categories",
                Some(ADMIN_TOKEN),
                Some(json!({
                    "name": name,
                    "description": "Community work",
                    "image": "category.png"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "category creation failed: {}", body);
        body["data"]["id"].as_str().unwrap().parse().unwrap()
    }

    /// Create an event as the organizer and return its id
    pub async fn create_event(&self, name: &str, required_volunteers: i32) -> Uuid {
        let category = self.create_category(&format!("{} category", name)).await;
        let (status, body) = self
            .send(
                "POST",
                "/api/events",
                Some(ORGANIZER_TOKEN),
                Some(event_body(name, category, required_volunteers)),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "event creation failed: {}", body);
        body["data"]["id"].as_str().unwrap().parse().unwrap()
    }
}

pub fn event_body(name: &str, category: Uuid, required_volunteers: i32) -> Value {
    let start = Utc::now() + Duration::days(7);
    json!({
        "name": name,
        "description": "Help us clean the river banks before spring",
        "startDate": start,
        "endDate": start + Duration::hours(4),
        "image": "river.png",
        "category": category,
        "isOnline": false,
        "isPublish": true,
        "isFeatured": false,
        "location": { "region": 3171, "address": "Jl. Sungai 1" },
        "requiredVolunteers": required_volunteers,
        "requirements": "Bring gloves",
        "tags": ["outdoor"]
    })
}

pub fn application_body() -> Value {
    json!({
        "motivation": "I want to help my neighbourhood",
        "skills": ["first aid"],
        "portfolioUrl": "https://example.com/me"
    })
}

fn token(subject_id: Uuid, role: Role) -> AccessToken {
    AccessToken {
        subject_id,
        role,
        is_active: true,
        expires_at: None,
    }
}
