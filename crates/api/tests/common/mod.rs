//! Helpers for the database-backed tests. They need `DATABASE_URL` pointing
//! at a disposable PostgreSQL database; every test creates its own
//! organization and application so tests can share it.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use paradigm_api::config::AppConfig;
use paradigm_api::{build_router, AppState};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let _ = dotenvy::dotenv();
        let config = AppConfig::from_env().expect("DATABASE_URL must be set for database tests");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&config.database_url)
            .await
            .expect("connect to test database");
        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .expect("run migrations");

        Self {
            router: build_router(AppState::new(pool, config)),
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// POST and return the new id, asserting success.
    pub async fn create(&self, uri: &str, body: Value) -> String {
        let (status, value) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::OK, "POST {uri}: {value}");
        id_of(&value)
    }

    pub async fn organization(&self) -> String {
        self.create(
            "/organizations",
            json!({ "title": "Daily Planet", "desc": "Metropolis news", "meta": {} }),
        )
        .await
    }

    pub async fn application(&self, organization_id: &str) -> String {
        self.create(
            "/applications",
            json!({ "organizationId": organization_id, "title": "Planet Web", "meta": {} }),
        )
        .await
    }

    pub async fn user(&self, organization_id: &str, slug: &str) -> String {
        self.create(
            "/users",
            json!({
                "organizationId": organization_id,
                "username": slug,
                "email": format!("{slug}@example.com"),
                "firstName": "Lois",
                "lastName": "Lane",
                "imageId": "img",
                "slug": slug,
                "timezone": "UTC",
                "bio": "",
                "hash": "x",
                "meta": {},
                "roles": { "applications": {}, "organizations": {} }
            }),
        )
        .await
    }

    pub async fn category(&self, application_id: &str, title: &str) -> String {
        self.create(
            "/categories",
            json!({
                "applicationId": application_id,
                "slug": title.to_lowercase(),
                "title": title
            }),
        )
        .await
    }

    pub async fn document(&self, application_id: &str, fields: Value) -> Value {
        let mut body = json!({
            "applicationId": application_id,
            "title": "Untitled",
            "slug": "untitled",
            "meta": {}
        });
        if let (Some(body), Some(fields)) = (body.as_object_mut(), fields.as_object()) {
            for (key, value) in fields {
                body.insert(key.clone(), value.clone());
            }
        }
        let (status, value) = self.post("/documents", body).await;
        assert_eq!(status, StatusCode::OK, "POST /documents: {value}");
        value
    }
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("response has an id").to_string()
}

pub fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("response is an array")
        .iter()
        .map(id_of)
        .collect()
}

pub fn category_titles(document: &Value) -> Vec<String> {
    document["categories"]
        .as_array()
        .expect("categories is an array")
        .iter()
        .map(|c| c["title"].as_str().unwrap_or_default().to_string())
        .collect()
}
