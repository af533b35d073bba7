use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the full application router over the shared state
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::public::health::health))
        // Public
        .merge(catalog_routes())
        .merge(login_routes())
        // Signed-in users; handlers redirect to /login otherwise
        .merge(category_routes())
        .merge(item_routes())
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn catalog_routes() -> Router<AppState> {
    use handlers::public::catalog;

    Router::new()
        .route("/", get(catalog::index))
        .route("/catalog", get(catalog::index))
        .route("/catalog/", get(catalog::index))
        .route("/catalog.json", get(catalog::catalog_json))
        .route("/catalog/:category_name/:entry/items", get(catalog::category_items))
        .route("/catalog/:category_name/:entry/:item_id", get(catalog::item_detail))
        .route("/catalog/:category_name/:entry/:item_id/JSON", get(catalog::item_json))
}

fn login_routes() -> Router<AppState> {
    use handlers::public::login;

    Router::new()
        .route("/login", get(login::login_page))
        .route("/glogin", post(login::glogin))
        .route("/glogout", get(login::glogout))
        .route("/logout", get(login::logout))
}

// Category routes share the `:entry` slot with item routes; here it holds
// the category id.
fn category_routes() -> Router<AppState> {
    use handlers::protected::category;

    Router::new()
        .route("/catalog/category/new", get(category::new_page).post(category::create))
        .route(
            "/catalog/:category_name/:entry/edit",
            get(category::edit_page).post(category::update),
        )
        .route(
            "/catalog/:category_name/:entry/delete",
            get(category::delete_page).post(category::destroy),
        )
}

fn item_routes() -> Router<AppState> {
    use handlers::protected::item;

    Router::new()
        .route("/catalog/item/new", get(item::new_page).post(item::create))
        .route(
            "/catalog/:category_name/:entry/item/new",
            get(item::new_in_category_page).post(item::create_in_category),
        )
        .route(
            "/catalog/:category_name/:entry/:item_id/edit",
            get(item::edit_page).post(item::update),
        )
        .route(
            "/catalog/:category_name/:entry/:item_id/delete",
            get(item::delete_page).post(item::destroy),
        )
}
