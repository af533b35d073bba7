use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::item::Item;

/// A user-owned grouping of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
}

impl Category {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Category as it appears in the catalog export, with its items nested
/// under the `Item` key.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryExport {
    #[serde(flatten)]
    pub category: Category,
    #[serde(rename = "Item")]
    pub items: Vec<Item>,
}
