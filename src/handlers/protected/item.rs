use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use serde::Deserialize;
use tracing::info;

use super::ownership::Denial;
use super::{deny, login_redirect, non_blank};
use crate::database::models::{Category, Item, ItemChanges, NewItem};
use crate::error::ApiError;
use crate::handlers::{paths, redirect_with_flash, render};
use crate::middleware::{CurrentUser, Session};
use crate::state::AppState;
use crate::views::{self, ItemForm};

/// Submitted item form. `categories` carries the selected category id.
#[derive(Debug, Default, Deserialize)]
pub struct ItemFormData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: String,
}

impl ItemFormData {
    fn name(&self) -> Option<&str> {
        non_blank(&self.name)
    }

    fn description(&self) -> Option<&str> {
        non_blank(&self.description)
    }

    fn category_id(&self) -> Result<Option<i64>, ApiError> {
        match non_blank(&self.categories) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| ApiError::bad_request(format!("Invalid category id: {}", raw))),
        }
    }
}

async fn render_form(
    state: &AppState,
    session: Session,
    action: String,
    heading: &str,
    item: Option<&Item>,
    selected_category: Option<i64>,
) -> Result<Response, ApiError> {
    let categories = state.repo.list_categories_by_name().await?;
    Ok(render(state, session, |chrome| {
        views::item_form(
            chrome,
            &ItemForm {
                action,
                heading,
                item,
                categories: &categories,
                selected_category,
            },
        )
    }))
}

/// Insert the submitted item under the selected category (or `fallback`
/// when nothing was selected), enforcing that the user owns that category.
async fn file_new_item(
    state: &AppState,
    mut session: Session,
    user: &CurrentUser,
    form: &ItemFormData,
    fallback: Option<&Category>,
    action: String,
) -> Result<Response, ApiError> {
    let selected = form.category_id()?;

    let Some(name) = form.name() else {
        session.flash("Item Name must not be blank");
        let preselect = selected.or(fallback.map(|c| c.id));
        return render_form(state, session, action, "New Item", None, preselect).await;
    };

    let category = match (selected, fallback) {
        (Some(id), Some(fallback)) if id == fallback.id => fallback.clone(),
        (Some(id), _) => state.repo.get_category(id).await?,
        (None, Some(fallback)) => fallback.clone(),
        (None, None) => {
            session.flash("Please select a category");
            return render_form(state, session, action, "New Item", None, None).await;
        }
    };

    if !category.is_owned_by(user.id) {
        let denial = match fallback {
            Some(_) => Denial::AddItemHere { item: name },
            None => Denial::FileItem { category: &category, item: name },
        };
        return Ok(deny(session, denial));
    }

    let item = state
        .repo
        .create_item(&NewItem {
            name: name.to_string(),
            description: form.description().map(str::to_string),
            category_id: category.id,
            user_id: user.id,
        })
        .await?;
    info!("User {} added item {} to category {}", user.id, item.id, category.id);

    Ok(redirect_with_flash(
        session,
        &paths::item_detail(&category.name, &item),
        format!("Catalog Item '{}' Successfully Added", item.name),
    ))
}

/// GET /catalog/item/new
pub async fn new_page(State(state): State<AppState>, session: Session) -> Result<Response, ApiError> {
    if session.current_user().is_none() {
        return Ok(login_redirect());
    }
    render_form(&state, session, paths::NEW_ITEM.to_string(), "New Item", None, None).await
}

/// POST /catalog/item/new
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ItemFormData>,
) -> Result<Response, ApiError> {
    let Some(user) = session.current_user() else {
        return Ok(login_redirect());
    };
    file_new_item(&state, session, &user, &form, None, paths::NEW_ITEM.to_string()).await
}

/// GET /catalog/:category_name/:category_id/item/new
pub async fn new_in_category_page(
    State(state): State<AppState>,
    session: Session,
    Path((_category_name, category_id)): Path<(String, i64)>,
) -> Result<Response, ApiError> {
    let Some(user) = session.current_user() else {
        return Ok(login_redirect());
    };

    let category = state.repo.get_category(category_id).await?;
    if !category.is_owned_by(user.id) {
        return Ok(deny(session, Denial::AddItemTo(&category)));
    }

    render_form(&state, session, paths::new_item_in(&category), "New Item", None, Some(category.id)).await
}

/// POST /catalog/:category_name/:category_id/item/new
pub async fn create_in_category(
    State(state): State<AppState>,
    session: Session,
    Path((_category_name, category_id)): Path<(String, i64)>,
    Form(form): Form<ItemFormData>,
) -> Result<Response, ApiError> {
    let Some(user) = session.current_user() else {
        return Ok(login_redirect());
    };

    let category = state.repo.get_category(category_id).await?;
    if !category.is_owned_by(user.id) {
        return Ok(deny(session, Denial::AddItemTo(&category)));
    }

    let action = paths::new_item_in(&category);
    file_new_item(&state, session, &user, &form, Some(&category), action).await
}

/// GET /catalog/:category_name/:item_name/:item_id/edit
pub async fn edit_page(
    State(state): State<AppState>,
    session: Session,
    Path((category_name, _item_name, item_id)): Path<(String, String, i64)>,
) -> Result<Response, ApiError> {
    let Some(user) = session.current_user() else {
        return Ok(login_redirect());
    };

    let item = state.repo.get_item(item_id).await?;
    if !item.is_owned_by(user.id) {
        return Ok(deny(session, Denial::EditItem(&item)));
    }

    let action = paths::edit_item(&category_name, &item);
    render_form(&state, session, action, "Edit Item", Some(&item), Some(item.category_id)).await
}

/// POST /catalog/:category_name/:item_name/:item_id/edit
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path((_category_name, _item_name, item_id)): Path<(String, String, i64)>,
    Form(form): Form<ItemFormData>,
) -> Result<Response, ApiError> {
    let Some(user) = session.current_user() else {
        return Ok(login_redirect());
    };

    let item = state.repo.get_item(item_id).await?;
    if !item.is_owned_by(user.id) {
        return Ok(deny(session, Denial::EditItem(&item)));
    }

    // Without a selection the item stays in its current category.
    let category = match form.category_id()? {
        Some(id) => {
            let target = state.repo.get_category(id).await?;
            if !target.is_owned_by(user.id) {
                let name = form.name().unwrap_or(&item.name);
                return Ok(deny(session, Denial::MoveItem { category: &target, item: name }));
            }
            target
        }
        None => state.repo.get_category(item.category_id).await?,
    };

    let updated = state
        .repo
        .update_item(
            item.id,
            ItemChanges {
                name: form.name().map(str::to_string),
                description: form.description().map(str::to_string),
                category_id: Some(category.id),
            },
        )
        .await?;
    info!("User {} edited item {}", user.id, updated.id);

    Ok(redirect_with_flash(
        session,
        &paths::item_detail(&category.name, &updated),
        format!("Catalog Item '{}' Successfully Edited", updated.name),
    ))
}

/// Load an item for deletion, enforcing that the user owns both the item and
/// the category it is filed under.
async fn deletable_item(
    state: &AppState,
    user: &CurrentUser,
    item_id: i64,
) -> Result<Result<(Item, Category), String>, ApiError> {
    let item = state.repo.get_item(item_id).await?;
    if !item.is_owned_by(user.id) {
        return Ok(Err(Denial::DeleteItem(&item).to_string()));
    }

    let category = state.repo.get_category(item.category_id).await?;
    if !category.is_owned_by(user.id) {
        return Ok(Err(Denial::DeleteItemIn { category: &category, item: &item }.to_string()));
    }

    Ok(Ok((item, category)))
}

/// GET /catalog/:category_name/:item_name/:item_id/delete
pub async fn delete_page(
    State(state): State<AppState>,
    session: Session,
    Path((_category_name, _item_name, item_id)): Path<(String, String, i64)>,
) -> Result<Response, ApiError> {
    let Some(user) = session.current_user() else {
        return Ok(login_redirect());
    };

    match deletable_item(&state, &user, item_id).await? {
        Ok((item, category)) => Ok(render(&state, session, |chrome| {
            views::delete_item(chrome, &category.name, &item)
        })),
        Err(message) => {
            tracing::warn!("User {} may not delete item {}", user.id, item_id);
            Ok(redirect_with_flash(session, paths::CATALOG, message))
        }
    }
}

/// POST /catalog/:category_name/:item_name/:item_id/delete
pub async fn destroy(
    State(state): State<AppState>,
    session: Session,
    Path((_category_name, _item_name, item_id)): Path<(String, String, i64)>,
) -> Result<Response, ApiError> {
    let Some(user) = session.current_user() else {
        return Ok(login_redirect());
    };

    let (item, _category) = match deletable_item(&state, &user, item_id).await? {
        Ok(found) => found,
        Err(message) => {
            tracing::warn!("User {} may not delete item {}", user.id, item_id);
            return Ok(redirect_with_flash(session, paths::CATALOG, message));
        }
    };

    state.repo.delete_item(item.id).await?;
    info!("User {} deleted item {}", user.id, item.id);

    Ok(redirect_with_flash(
        session,
        paths::CATALOG,
        format!("Catalog Item '{}' Successfully deleted", item.name),
    ))
}
