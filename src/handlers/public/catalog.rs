// handlers/public/catalog.rs - Read-only catalog pages and JSON views

use axum::{
    extract::{Path, State},
    response::{Json, Response},
};
use serde_json::{json, Value};

use crate::database::models::Item;
use crate::error::ApiError;
use crate::handlers::render;
use crate::middleware::Session;
use crate::state::AppState;
use crate::views;

/// GET /, /catalog - categories by name plus the most recently added items.
/// The latest list is as long as the category list.
pub async fn index(State(state): State<AppState>, session: Session) -> Result<Response, ApiError> {
    let categories = state.repo.list_categories_by_name().await?;
    let latest = state.repo.latest_items(categories.len() as i64).await?;

    Ok(render(&state, session, |chrome| views::catalog_index(chrome, &categories, &latest)))
}

/// GET /catalog/:category_name/:category_id/items
pub async fn category_items(
    State(state): State<AppState>,
    session: Session,
    Path((_category_name, category_id)): Path<(String, i64)>,
) -> Result<Response, ApiError> {
    let category = state.repo.get_category(category_id).await?;
    let categories = state.repo.list_categories_by_name().await?;
    let items = state.repo.items_in_category(category.id).await?;
    let rows = state.repo.count_items_in_category(category.id).await?;
    let user_id = session.data().user_id;

    Ok(render(&state, session, |chrome| {
        views::category_items(chrome, &categories, &category, &items, rows, user_id)
    }))
}

/// GET /catalog/:category_name/:item_name/:item_id
pub async fn item_detail(
    State(state): State<AppState>,
    session: Session,
    Path((_category_name, _item_name, item_id)): Path<(String, String, i64)>,
) -> Result<Response, ApiError> {
    let item = state.repo.get_item(item_id).await?;
    let category = state.repo.get_category(item.category_id).await?;
    let user_id = session.data().user_id;

    Ok(render(&state, session, |chrome| views::item_detail(chrome, &item, &category, user_id)))
}

/// GET /catalog/:category_name/:item_name/:item_id/JSON
pub async fn item_json(
    State(state): State<AppState>,
    Path((_category_name, _item_name, item_id)): Path<(String, String, i64)>,
) -> Result<Json<Item>, ApiError> {
    Ok(Json(state.repo.get_item(item_id).await?))
}

/// GET /catalog.json
pub async fn catalog_json(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let categories = state.repo.export_catalog().await?;
    Ok(Json(json!({ "categories": categories })))
}
