#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use axum_extra::extract::cookie::Cookie;
use tower::ServiceExt;

use item_catalog::app::app;
use item_catalog::auth::provider::{Credentials, TokenInfo, UserInfo};
use item_catalog::auth::{IdentityProvider, OAuthError, SessionData, SessionKeys};
use item_catalog::config::{AppConfig, DatabaseConfig};
use item_catalog::database::models::NewUser;
use item_catalog::database::{CatalogRepository, DatabaseManager};
use item_catalog::state::AppState;

pub const CLIENT_ID: &str = "test-client.apps.googleusercontent.com";

/// Identity provider double. The authorization code doubles as the account
/// name: code `ada` signs in as `Ada` with `ada@example.com`. The code
/// `rejected` fails the exchange and `foreign` yields a token issued to some
/// other client.
pub struct FakeProvider;

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn client_id(&self) -> &str {
        CLIENT_ID
    }

    async fn exchange_code(&self, code: &str) -> Result<Credentials, OAuthError> {
        if code == "rejected" {
            return Err(OAuthError::Exchange("invalid_grant".to_string()));
        }
        Ok(Credentials {
            access_token: format!("token-{}", code),
            subject: format!("sub-{}", code),
        })
    }

    async fn token_info(&self, access_token: &str) -> Result<TokenInfo, OAuthError> {
        let code = access_token.trim_start_matches("token-");
        let issued_to = if code == "foreign" { "someone-else" } else { CLIENT_ID };
        Ok(TokenInfo {
            user_id: Some(format!("sub-{}", code)),
            issued_to: Some(issued_to.to_string()),
            error: None,
        })
    }

    async fn user_info(&self, access_token: &str) -> Result<UserInfo, OAuthError> {
        let code = access_token.trim_start_matches("token-");
        Ok(UserInfo {
            name: display_name(code),
            email: format!("{}@example.com", code),
            picture: Some(format!("https://example.com/{}.png", code)),
        })
    }

    async fn revoke(&self, _access_token: &str) -> Result<bool, OAuthError> {
        Ok(true)
    }
}

fn display_name(code: &str) -> String {
    let mut chars = code.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The full router over a private in-memory database
pub struct TestApp {
    pub router: Router,
    pub repo: CatalogRepository,
    pub keys: Arc<SessionKeys>,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::development();
        let pool = DatabaseManager::open(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connection_timeout: 5,
        })
        .await?;

        let repo = CatalogRepository::new(pool);
        let state = AppState::new(
            repo.clone(),
            SessionKeys::new(&config.session)?,
            Arc::new(FakeProvider),
            "Item Catalog",
        );
        let keys = state.session_keys.clone();

        Ok(Self { router: app(state), repo, keys })
    }

    /// Insert a user row and return its id
    pub async fn user(&self, name: &str) -> Result<i64> {
        let id = self
            .repo
            .create_user(&NewUser {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                picture: None,
            })
            .await?;
        Ok(id)
    }

    /// `Cookie` header value for an arbitrary session
    pub fn cookie(&self, data: &SessionData) -> Result<String> {
        let token = self.keys.encode(data)?;
        Ok(Cookie::new(self.keys.cookie_name.clone(), token).to_string())
    }

    /// `Cookie` header value for a session signed in as `user_id`
    pub fn signed_in(&self, user_id: i64, name: &str) -> Result<String> {
        self.cookie(&SessionData {
            access_token: Some(format!("token-{}", name.to_lowercase())),
            gplus_id: Some(format!("sub-{}", name.to_lowercase())),
            username: Some(name.to_string()),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            user_id: Some(user_id),
            provider: Some("google".to_string()),
            ..Default::default()
        })
    }

    pub async fn send(&self, request: Request<Body>) -> Result<Response> {
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Result<Response> {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty())?).await
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)], cookie: Option<&str>) -> Result<Response> {
        let body: String = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body))?).await
    }

    /// Session carried by the response's `Set-Cookie`, if it issued one
    pub fn session_of(&self, response: &Response) -> Result<Option<SessionData>> {
        for value in response.headers().get_all(header::SET_COOKIE) {
            let cookie = Cookie::parse(value.to_str()?.to_string())?;
            if cookie.name() == self.keys.cookie_name {
                return Ok(Some(self.keys.decode(cookie.value())?));
            }
        }
        Ok(None)
    }

    /// Flash messages queued by the response
    pub fn flashes_of(&self, response: &Response) -> Result<Vec<String>> {
        Ok(self.session_of(response)?.map(|s| s.flashes).unwrap_or_default())
    }
}

pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub fn assert_redirect(response: &Response, to: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "expected redirect to {}", to);
    assert_eq!(location(response), Some(to));
}

pub async fn body_string(response: Response) -> Result<String> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .context("failed to read response body")?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

pub async fn body_json(response: Response) -> Result<serde_json::Value> {
    let body = body_string(response).await?;
    Ok(serde_json::from_str(&body)?)
}
