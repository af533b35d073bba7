use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A catalog entry filed under one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created: DateTime<Utc>,
    pub category_id: i64,
    pub user_id: i64,
}

impl Item {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub user_id: i64,
}

/// Field updates for an item; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
}

/// Entry in the "latest items" list on the catalog index
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct LatestItem {
    pub id: i64,
    pub name: String,
    pub category: String,
}
