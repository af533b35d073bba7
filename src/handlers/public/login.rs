// handlers/public/login.rs - Sign-in and sign-out against the identity provider
//
// GET /login mints the anti-forgery state; POST /glogin exchanges the
// authorization code sent by the sign-in button; /glogout and /logout revoke
// the provider token.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::auth::{self, ConnectOutcome};
use crate::error::ApiError;
use crate::handlers::{paths, redirect_with_flash, render};
use crate::middleware::{ApiResponse, Session};
use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub state: Option<String>,
}

/// GET /login
pub async fn login_page(State(state): State<AppState>, mut session: Session) -> Response {
    let token = auth::new_state_token();
    session.data_mut().state = Some(token.clone());

    let client_id = state.identity.client_id().to_string();
    render(&state, session, |chrome| views::login(chrome, &token, &client_id))
}

/// POST /glogin?state=... with the one-time authorization code as the body
pub async fn glogin(
    State(state): State<AppState>,
    mut session: Session,
    Query(query): Query<ConnectQuery>,
    code: String,
) -> Response {
    let outcome = auth::connect(
        state.identity.as_ref(),
        &state.repo,
        session.data_mut(),
        query.state.as_deref(),
        code.trim(),
    )
    .await;

    // Failures still persist whatever the checklist stored in the session.
    match outcome {
        Ok(ConnectOutcome::AlreadyConnected) => {
            (session, ApiResponse::success("Current user is already connected.")).into_response()
        }
        Ok(ConnectOutcome::Connected { username, picture, .. }) => {
            session.flash(format!("you are now logged in as {}", username));
            (session, Html(views::welcome(&username, picture.as_deref()))).into_response()
        }
        Err(e) => (session, ApiError::from(e)).into_response(),
    }
}

/// GET /glogout
pub async fn glogout(State(state): State<AppState>, session: Session) -> Result<Response, ApiError> {
    auth::disconnect(state.identity.as_ref(), session.data()).await?;
    info!("Revoked provider token for user {:?}", session.data().user_id);
    Ok(ApiResponse::success("Successfully disconnected.").into_response())
}

/// GET /logout
pub async fn logout(State(state): State<AppState>, mut session: Session) -> Response {
    let Some(provider) = session.data().provider.clone() else {
        return redirect_with_flash(session, paths::CATALOG, "You were not logged in");
    };

    if provider == state.identity.name() {
        if let Err(e) = auth::disconnect(state.identity.as_ref(), session.data()).await {
            tracing::warn!("Provider sign-out for {} did not complete: {}", provider, e);
        }
    }

    let user_id = session.data().user_id;
    session.data_mut().clear_identity();
    info!("User {:?} logged out", user_id);

    redirect_with_flash(session, paths::CATALOG, "You have successfully been logged out.")
}
