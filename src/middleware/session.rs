use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
    response::{IntoResponseParts, ResponseParts},
};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::{SessionData, SessionKeys};
use crate::state::AppState;

/// The signed-in user as recorded in the session
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
}

/// Per-request session backed by a signed cookie.
///
/// Handlers mutate it and return it as part of the response; the cookie is
/// only re-issued when something changed.
pub struct Session {
    data: SessionData,
    keys: Arc<SessionKeys>,
    dirty: bool,
}

impl Session {
    pub fn new(data: SessionData, keys: Arc<SessionKeys>) -> Self {
        Self { data, keys, dirty: false }
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut SessionData {
        self.dirty = true;
        &mut self.data
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.data.user_id.map(|id| CurrentUser {
            id,
            name: self.data.username.clone().unwrap_or_default(),
        })
    }

    pub fn username(&self) -> Option<&str> {
        self.data.username.as_deref()
    }

    pub fn flash(&mut self, message: impl Into<String>) {
        self.data_mut().flashes.push(message.into());
    }

    /// Drain pending flash messages for rendering
    pub fn take_flashes(&mut self) -> Vec<String> {
        if self.data.flashes.is_empty() {
            return Vec::new();
        }
        std::mem::take(&mut self.data_mut().flashes)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let keys = state.session_keys.clone();
        let data = session_token(&parts.headers, &keys.cookie_name)
            .and_then(|token| match keys.decode(&token) {
                Ok(data) => Some(data),
                Err(e) => {
                    tracing::debug!("Discarding unreadable session cookie: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        Ok(Session::new(data, keys))
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if !self.dirty {
            return Ok(res);
        }

        match self.keys.encode(&self.data) {
            Ok(token) => CookieJar::new().add(self.keys.cookie(token)).into_response_parts(res),
            Err(e) => {
                tracing::error!("Failed to encode session: {}", e);
                Ok(res)
            }
        }
    }
}

/// Value of the named session cookie across all `Cookie` headers
pub fn session_token(headers: &HeaderMap, name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(name)
        .map(|cookie| cookie.value().to_string())
}
