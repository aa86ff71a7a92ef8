//! Shared harness: an in-memory catalog behind the full router, driven like
//! a browser that keeps its session cookie between requests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use library_catalog::auth::SessionKeys;
use library_catalog::config::Credentials;
use library_catalog::infrastructure::AppState;
use library_catalog::{db, seed, server};
use sea_orm::DatabaseConnection;
use secrecy::SecretString;
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

pub const USERNAME: &str = "user";
pub const PASSWORD: &str = "pass";

pub struct Reply {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("JSON body")
    }
}

pub struct Client {
    pub db: DatabaseConnection,
    router: Router,
    cookie: Option<String>,
}

impl Client {
    pub async fn new() -> Self {
        let db = db::init_db("sqlite::memory:")
            .await
            .expect("Failed to init DB");
        let keys = SessionKeys::new(
            &SecretString::new("test-session-secret".to_string()),
            &SecretString::new("test-csrf-secret".to_string()),
            1,
        );
        let state = AppState::new(db.clone(), Credentials::new(USERNAME, PASSWORD), keys);

        Self {
            db,
            router: server::build_router(state),
            cookie: None,
        }
    }

    pub async fn seeded() -> Self {
        let client = Self::new().await;
        seed::seed_catalog(&client.db)
            .await
            .expect("Failed to seed catalog");
        client
    }

    /// Fresh user agent against the same application
    pub fn without_cookie(&self) -> Self {
        Self {
            db: self.db.clone(),
            router: self.router.clone(),
            cookie: None,
        }
    }

    pub fn set_cookie(&mut self, pair: &str) {
        self.cookie = Some(pair.to_string());
    }

    pub async fn get(&mut self, uri: &str) -> Reply {
        let req = Request::builder().uri(uri).method("GET");
        self.send(req, Body::empty()).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> Reply {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let req = Request::builder()
            .uri(uri)
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(req, Body::from(body)).await
    }

    async fn send(&mut self, mut req: axum::http::request::Builder, body: Body) -> Reply {
        if let Some(cookie) = &self.cookie {
            req = req.header(header::COOKIE, cookie);
        }
        let response = self
            .router
            .clone()
            .oneshot(req.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        Reply {
            status,
            location,
            body,
        }
    }

    pub async fn login(&mut self) {
        let reply = self
            .post_form("/login", &[("username", USERNAME), ("password", PASSWORD)])
            .await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER);
    }

    /// Read-only access: any non-empty username
    pub async fn authorize(&mut self) {
        let reply = self
            .post_form("/login", &[("username", "visitor"), ("password", "")])
            .await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER);
    }

    /// Token embedded in the add forms for this session
    pub async fn csrf_token(&mut self) -> String {
        let page = self.get("/add_book").await.json();
        page["csrf_token"].as_str().unwrap().to_string()
    }
}

/// Ids of the entries of a choice list that are marked selected
pub fn selected_ids(choices: &Value) -> Vec<i64> {
    choices
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["selected"].as_bool() == Some(true))
        .map(|c| c["id"].as_i64().unwrap())
        .collect()
}

pub fn labels(links: &Value) -> Vec<String> {
    links
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["label"].as_str().unwrap().to_string())
        .collect()
}
