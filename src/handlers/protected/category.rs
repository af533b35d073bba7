use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use serde::Deserialize;
use tracing::info;

use super::ownership::Denial;
use super::{deny, login_redirect, non_blank};
use crate::error::ApiError;
use crate::handlers::{paths, redirect_with_flash, render};
use crate::middleware::Session;
use crate::state::AppState;
use crate::views;

#[derive(Debug, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
}

/// GET /catalog/category/new
pub async fn new_page(State(state): State<AppState>, session: Session) -> Response {
    if session.current_user().is_none() {
        return login_redirect();
    }
    render(&state, session, views::new_category)
}

/// POST /catalog/category/new
pub async fn create(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<CategoryForm>,
) -> Result<Response, ApiError> {
    let Some(user) = session.current_user() else {
        return Ok(login_redirect());
    };

    let Some(name) = non_blank(&form.name) else {
        session.flash("Category Name must not be blank");
        return Ok(render(&state, session, views::new_category));
    };

    let category = state.repo.create_category(name, user.id).await?;
    info!("User {} created category {} ({})", user.id, category.id, category.name);

    Ok(redirect_with_flash(
        session,
        paths::CATALOG,
        format!("Catalog Category '{}' Successfully Added by {}", category.name, user.name),
    ))
}

/// GET /catalog/:category_name/:category_id/edit
pub async fn edit_page(
    State(state): State<AppState>,
    session: Session,
    Path((_category_name, category_id)): Path<(String, i64)>,
) -> Result<Response, ApiError> {
    let Some(user) = session.current_user() else {
        return Ok(login_redirect());
    };

    let category = state.repo.get_category(category_id).await?;
    if !category.is_owned_by(user.id) {
        return Ok(deny(session, Denial::EditCategory(&category)));
    }

    Ok(render(&state, session, |chrome| views::edit_category(chrome, &category)))
}

/// POST /catalog/:category_name/:category_id/edit
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path((_category_name, category_id)): Path<(String, i64)>,
    Form(form): Form<CategoryForm>,
) -> Result<Response, ApiError> {
    let Some(user) = session.current_user() else {
        return Ok(login_redirect());
    };

    let mut category = state.repo.get_category(category_id).await?;
    if !category.is_owned_by(user.id) {
        return Ok(deny(session, Denial::EditCategory(&category)));
    }

    if let Some(name) = non_blank(&form.name) {
        state.repo.rename_category(category.id, name).await?;
        category.name = name.to_string();
    }

    Ok(redirect_with_flash(
        session,
        paths::CATALOG,
        format!("Catalog Category '{}' Successfully Edited", category.name),
    ))
}

/// GET /catalog/:category_name/:category_id/delete
pub async fn delete_page(
    State(state): State<AppState>,
    session: Session,
    Path((_category_name, category_id)): Path<(String, i64)>,
) -> Result<Response, ApiError> {
    let Some(user) = session.current_user() else {
        return Ok(login_redirect());
    };

    let category = state.repo.get_category(category_id).await?;
    if !category.is_owned_by(user.id) {
        return Ok(deny(session, Denial::DeleteCategory(&category)));
    }

    Ok(render(&state, session, |chrome| views::delete_category(chrome, &category)))
}

/// POST /catalog/:category_name/:category_id/delete
pub async fn destroy(
    State(state): State<AppState>,
    session: Session,
    Path((_category_name, category_id)): Path<(String, i64)>,
) -> Result<Response, ApiError> {
    let Some(user) = session.current_user() else {
        return Ok(login_redirect());
    };

    let category = state.repo.get_category(category_id).await?;
    if !category.is_owned_by(user.id) {
        return Ok(deny(session, Denial::DeleteCategory(&category)));
    }

    let removed = state.repo.delete_category_with_items(category.id).await?;
    info!("User {} deleted category {} with {} item(s)", user.id, category.id, removed);

    Ok(redirect_with_flash(
        session,
        paths::CATALOG,
        format!("Catalog Category '{}' and all its Items Successfully Deleted", category.name),
    ))
}
