// Request handlers, split by access tier:
// public (anyone may read) and protected (requires a signed-in session,
// writes gated by the owner check).
pub mod paths;
pub mod protected;
pub mod public;

use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::middleware::Session;
use crate::state::AppState;
use crate::views::Chrome;

/// Render a page, draining pending flash messages into it
pub(crate) fn render(state: &AppState, mut session: Session, view: impl FnOnce(&Chrome) -> String) -> Response {
    let flashes = session.take_flashes();
    let html = view(&Chrome {
        app_name: &state.application_name,
        username: session.username(),
        flashes: &flashes,
    });
    (session, Html(html)).into_response()
}

pub(crate) fn redirect_with_flash(mut session: Session, to: &str, message: impl Into<String>) -> Response {
    session.flash(message);
    (session, Redirect::to(to)).into_response()
}
