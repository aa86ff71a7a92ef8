//! Cookie-backed sessions and the access guards built on them
//!
//! The session lives entirely in a signed cookie: an HS256 JWT carrying the
//! session id, the two access flags and pending flash messages. Nothing is
//! stored server side.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponseParts, ResponseParts},
};

use crate::domain::{AccessFlags, Tier};
use crate::infrastructure::config::MAX_SESSION_TTL_HOURS;
use crate::infrastructure::csrf;

pub const SESSION_COOKIE: &str = "catalog_session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sid: String,
    #[serde(flatten)]
    pub access: AccessFlags,
    #[serde(default)]
    pub flashes: Vec<String>,
    pub exp: usize,
}

struct KeyMaterial {
    encoding: EncodingKey,
    decoding: DecodingKey,
    csrf: SecretString,
    ttl: Duration,
}

/// Signing keys shared by every request
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<KeyMaterial>,
}

impl SessionKeys {
    pub fn new(secret_key: &SecretString, csrf_secret_key: &SecretString, ttl_hours: i64) -> Self {
        let secret = secret_key.expose_secret().as_bytes();
        Self {
            inner: Arc::new(KeyMaterial {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
                csrf: SecretString::new(csrf_secret_key.expose_secret().clone()),
                ttl: Duration::hours(ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS)),
            }),
        }
    }
}

pub struct Session {
    claims: SessionClaims,
    keys: SessionKeys,
}

impl Session {
    /// A fresh anonymous session with a new random id
    pub fn new(keys: SessionKeys) -> Self {
        Self {
            claims: SessionClaims {
                sid: uuid::Uuid::new_v4().to_string(),
                access: AccessFlags::default(),
                flashes: Vec::new(),
                exp: 0,
            },
            keys,
        }
    }

    /// Restore the session from the request cookie.
    /// Missing, tampered or expired cookies start over as anonymous.
    pub fn from_headers(headers: &HeaderMap, keys: &SessionKeys) -> Self {
        let Some(token) = session_cookie(headers) else {
            return Self::new(keys.clone());
        };

        match decode::<SessionClaims>(token, &keys.inner.decoding, &Validation::default()) {
            Ok(data) => Self {
                claims: data.claims,
                keys: keys.clone(),
            },
            Err(e) => {
                tracing::debug!("Discarding session cookie: {}", e);
                Self::new(keys.clone())
            }
        }
    }

    pub fn id(&self) -> &str {
        &self.claims.sid
    }

    pub fn access(&self) -> AccessFlags {
        self.claims.access
    }

    pub fn access_mut(&mut self) -> &mut AccessFlags {
        &mut self.claims.access
    }

    /// Queue a message for the next rendered page
    pub fn flash(&mut self, message: impl Into<String>) {
        self.claims.flashes.push(message.into());
    }

    pub fn take_flashes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.claims.flashes)
    }

    pub fn csrf_token(&self) -> String {
        csrf::token_for(
            self.keys.inner.csrf.expose_secret().as_bytes(),
            &self.claims.sid,
        )
    }

    pub fn verify_csrf(&self, token: &str) -> bool {
        csrf::verify(
            self.keys.inner.csrf.expose_secret().as_bytes(),
            &self.claims.sid,
            token,
        )
    }

    /// Encode as a `Set-Cookie` value, pushing the expiry forward
    pub fn to_cookie(&self) -> Result<HeaderValue, String> {
        let ttl = self.keys.inner.ttl;
        let expiration = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| "session expiry out of range".to_string())?
            .timestamp();

        let claims = SessionClaims {
            exp: expiration as usize,
            ..self.claims.clone()
        };

        let token = encode(&Header::default(), &claims, &self.keys.inner.encoding)
            .map_err(|e| e.to_string())?;

        HeaderValue::from_str(&format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE,
            token,
            ttl.num_seconds()
        ))
        .map_err(|e| e.to_string())
    }
}

fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    SessionKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        Ok(Session::from_headers(&parts.headers, &keys))
    }
}

// Every response carrying the session re-issues the cookie
impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        match self.to_cookie() {
            Ok(cookie) => {
                res.headers_mut().append(SET_COOKIE, cookie);
            }
            Err(e) => tracing::error!("Failed to encode session cookie: {}", e),
        }
        Ok(res)
    }
}

async fn guarded<S>(parts: &mut Parts, state: &S, tier: Tier) -> Result<Session, StatusCode>
where
    SessionKeys: FromRef<S>,
    S: Send + Sync,
{
    let keys = SessionKeys::from_ref(state);
    let session = Session::from_headers(&parts.headers, &keys);

    if session.access().permits(tier) {
        Ok(session)
    } else {
        tracing::debug!("Rejected {:?}-tier request to {}", tier, parts.uri.path());
        Err(StatusCode::UNAUTHORIZED)
    }
}

/// Session that holds at least the read tier, 401 otherwise
pub struct AuthRequired(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for AuthRequired
where
    SessionKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        guarded(parts, state, Tier::Auth).await.map(AuthRequired)
    }
}

/// Session that holds the mutation tier, 401 otherwise
pub struct LoginRequired(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for LoginRequired
where
    SessionKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        guarded(parts, state, Tier::Login).await.map(LoginRequired)
    }
}
