// Handlers that require a signed-in session. Writes are additionally gated
// by the owner check; failures flash a message and return to the catalog.
pub mod category;
pub mod item;
pub mod ownership;

use axum::response::{IntoResponse, Redirect, Response};

use super::{paths, redirect_with_flash};
use crate::middleware::Session;
use ownership::Denial;

pub(crate) fn login_redirect() -> Response {
    Redirect::to(paths::LOGIN).into_response()
}

pub(crate) fn deny(session: Session, denial: Denial<'_>) -> Response {
    tracing::warn!(
        "Owner check failed for user {:?}: {:?}",
        session.data().user_id,
        denial
    );
    redirect_with_flash(session, paths::CATALOG, denial.to_string())
}

/// Treat empty and whitespace-only form fields as absent
pub(crate) fn non_blank(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
