use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SessionConfig;

/// Everything the application keeps between requests for one browser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Anti-forgery token minted by the login page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Provider subject identifier of the connected account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gplus_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Messages shown once on the next rendered page
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<String>,
}

impl SessionData {
    /// Forget the signed-in identity, keeping the anti-forgery token and
    /// pending flashes.
    pub fn clear_identity(&mut self) {
        self.access_token = None;
        self.gplus_id = None;
        self.username = None;
        self.email = None;
        self.picture = None;
        self.user_id = None;
        self.provider = None;
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(flatten)]
    data: SessionData,
    exp: i64,
    iat: i64,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid session secret")]
    InvalidSecret,

    #[error("Session expiry out of range: {0} hours")]
    InvalidExpiry(u64),

    #[error("Session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Longest accepted session lifetime (ten years)
pub const MAX_EXPIRY_HOURS: u64 = 24 * 365 * 10;

/// Signs and verifies the session cookie payload (HS256 JWT).
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    pub cookie_name: String,
    pub expiry_hours: u64,
    pub secure: bool,
}

impl SessionKeys {
    pub fn new(config: &SessionConfig) -> Result<Self, SessionError> {
        if config.secret.is_empty() {
            return Err(SessionError::InvalidSecret);
        }
        if !(1..=MAX_EXPIRY_HOURS).contains(&config.expiry_hours) {
            return Err(SessionError::InvalidExpiry(config.expiry_hours));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            cookie_name: config.cookie_name.clone(),
            expiry_hours: config.expiry_hours,
            secure: config.secure_cookie,
        })
    }

    pub fn encode(&self, data: &SessionData) -> Result<String, SessionError> {
        let now = Utc::now();
        let claims = SessionClaims {
            data: data.clone(),
            exp: (now + Duration::hours(self.expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn decode(&self, token: &str) -> Result<SessionData, SessionError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding, &Validation::default())?;
        Ok(token_data.claims.data)
    }

    /// Session cookie carrying `token`
    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(cookie::time::Duration::hours(self.expiry_hours as i64))
            .secure(self.secure)
            .build()
    }
}
