//! Sign-in and sign-out against the identity provider.
//!
//! `connect` runs the fixed checklist that turns an authorization code into a
//! signed-in session: anti-forgery state, code exchange, token-info checks on
//! subject and audience, then the local user upsert keyed by email.

use thiserror::Error;
use rand::Rng;
use tracing::info;

use super::provider::{IdentityProvider, OAuthError};
use super::session::SessionData;
use crate::database::models::NewUser;
use crate::database::{CatalogRepository, DatabaseError};

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Invalid state parameter.")]
    InvalidState,

    #[error("Failed to upgrade the authorization code.")]
    CodeExchange(#[source] OAuthError),

    #[error("{0}")]
    TokenInfo(String),

    #[error("Token's user ID doesn't match given user ID.")]
    SubjectMismatch,

    #[error("Token's client ID does not match app's.")]
    ClientMismatch,

    #[error("Failed to fetch user info.")]
    UserInfo(#[source] OAuthError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Error)]
pub enum DisconnectError {
    #[error("Current user not connected.")]
    NotConnected,

    #[error("Failed to revoke token for given user.")]
    RevokeFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectOutcome {
    /// The session already holds a token for this account
    AlreadyConnected,
    Connected { user_id: i64, username: String, picture: Option<String> },
}

const STATE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const STATE_LEN: usize = 32;

/// Mint a fresh anti-forgery token: 32 uppercase letters and digits.
pub fn new_state_token() -> String {
    let mut rng = rand::thread_rng();
    (0..STATE_LEN)
        .map(|_| STATE_ALPHABET[rng.gen_range(0..STATE_ALPHABET.len())] as char)
        .collect()
}

pub async fn connect(
    provider: &dyn IdentityProvider,
    repo: &CatalogRepository,
    session: &mut SessionData,
    state: Option<&str>,
    code: &str,
) -> Result<ConnectOutcome, ConnectError> {
    match (state, session.state.as_deref()) {
        (Some(given), Some(expected)) if given == expected => {}
        _ => return Err(ConnectError::InvalidState),
    }

    let credentials = provider
        .exchange_code(code)
        .await
        .map_err(ConnectError::CodeExchange)?;

    let token_info = provider
        .token_info(&credentials.access_token)
        .await
        .map_err(|e| ConnectError::TokenInfo(e.to_string()))?;
    if let Some(error) = token_info.error {
        return Err(ConnectError::TokenInfo(error));
    }
    if token_info.user_id.as_deref() != Some(credentials.subject.as_str()) {
        return Err(ConnectError::SubjectMismatch);
    }
    if token_info.issued_to.as_deref() != Some(provider.client_id()) {
        return Err(ConnectError::ClientMismatch);
    }

    if session.access_token.is_some() && session.gplus_id.as_deref() == Some(credentials.subject.as_str()) {
        return Ok(ConnectOutcome::AlreadyConnected);
    }

    session.access_token = Some(credentials.access_token.clone());
    session.gplus_id = Some(credentials.subject);

    let profile = provider
        .user_info(&credentials.access_token)
        .await
        .map_err(ConnectError::UserInfo)?;

    session.username = Some(profile.name.clone());
    session.picture = profile.picture.clone();
    session.email = Some(profile.email.clone());
    session.provider = Some(provider.name().to_string());

    let user_id = repo
        .get_or_create_user(&NewUser {
            name: profile.name.clone(),
            email: profile.email,
            picture: profile.picture.clone(),
        })
        .await?;
    session.user_id = Some(user_id);

    info!("User {} ({}) signed in via {}", user_id, profile.name, provider.name());
    Ok(ConnectOutcome::Connected {
        user_id,
        username: profile.name,
        picture: profile.picture,
    })
}

/// Revoke the session's access token at the provider. The session itself is
/// left untouched.
pub async fn disconnect(provider: &dyn IdentityProvider, session: &SessionData) -> Result<(), DisconnectError> {
    let access_token = session.access_token.as_deref().ok_or(DisconnectError::NotConnected)?;
    match provider.revoke(access_token).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(DisconnectError::RevokeFailed),
        Err(e) => {
            tracing::warn!("Token revocation failed: {}", e);
            Err(DisconnectError::RevokeFailed)
        }
    }
}
