use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Category, CategoryExport, Item, ItemChanges, LatestItem, NewItem, NewUser, User,
};

const CATEGORY_COLUMNS: &str = "id, name, user_id";
const ITEM_COLUMNS: &str = "id, name, description, created, category_id, user_id";

/// Typed access to the catalog tables. Each call runs as its own
/// autocommitted statement.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// Users
impl CatalogRepository {
    pub async fn find_user(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT id, name, email, picture FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_user_id_by_email(&self, email: &str) -> Result<Option<i64>, DatabaseError> {
        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<i64, DatabaseError> {
        let id = sqlx::query("INSERT INTO users (name, email, picture) VALUES (?, ?, ?)")
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.picture)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        debug!("Created user {} <{}>", id, user.email);
        Ok(id)
    }

    /// Return the id of the user registered under `user.email`, creating the
    /// row on first sight.
    pub async fn get_or_create_user(&self, user: &NewUser) -> Result<i64, DatabaseError> {
        match self.find_user_id_by_email(&user.email).await? {
            Some(id) => Ok(id),
            None => self.create_user(user).await,
        }
    }
}

// Categories
impl CatalogRepository {
    pub async fn list_categories_by_name(&self) -> Result<Vec<Category>, DatabaseError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name ASC, id ASC");
        Ok(sqlx::query_as::<_, Category>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn count_categories(&self) -> Result<i64, DatabaseError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn find_category(&self, id: i64) -> Result<Option<Category>, DatabaseError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?");
        Ok(sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn get_category(&self, id: i64) -> Result<Category, DatabaseError> {
        self.find_category(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn create_category(&self, name: &str, user_id: i64) -> Result<Category, DatabaseError> {
        let id = sqlx::query("INSERT INTO categories (name, user_id) VALUES (?, ?)")
            .bind(name)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        Ok(Category { id, name: name.to_string(), user_id })
    }

    pub async fn rename_category(&self, id: i64, name: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Category {} not found", id)));
        }
        Ok(())
    }

    /// Delete every item filed under the category, then the category itself.
    /// Returns the number of items removed.
    pub async fn delete_category_with_items(&self, id: i64) -> Result<u64, DatabaseError> {
        let items = sqlx::query("DELETE FROM items WHERE category_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Category {} not found", id)));
        }
        Ok(items)
    }
}

// Items
impl CatalogRepository {
    pub async fn find_item(&self, id: i64) -> Result<Option<Item>, DatabaseError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?");
        Ok(sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn get_item(&self, id: i64) -> Result<Item, DatabaseError> {
        self.find_item(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Item {} not found", id)))
    }

    pub async fn items_in_category(&self, category_id: i64) -> Result<Vec<Item>, DatabaseError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE category_id = ? ORDER BY id ASC");
        Ok(sqlx::query_as::<_, Item>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn count_items_in_category(&self, category_id: i64) -> Result<i64, DatabaseError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items WHERE category_id = ?")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn create_item(&self, item: &NewItem) -> Result<Item, DatabaseError> {
        let created = Utc::now();
        let id = sqlx::query(
            "INSERT INTO items (name, description, created, category_id, user_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(created)
        .bind(item.category_id)
        .bind(item.user_id)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(Item {
            id,
            name: item.name.clone(),
            description: item.description.clone(),
            created,
            category_id: item.category_id,
            user_id: item.user_id,
        })
    }

    pub async fn update_item(&self, id: i64, changes: ItemChanges) -> Result<Item, DatabaseError> {
        let mut item = self.get_item(id).await?;
        if let Some(name) = changes.name {
            item.name = name;
        }
        if let Some(description) = changes.description {
            item.description = Some(description);
        }
        if let Some(category_id) = changes.category_id {
            item.category_id = category_id;
        }

        sqlx::query("UPDATE items SET name = ?, description = ?, category_id = ? WHERE id = ?")
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.category_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(item)
    }

    pub async fn delete_item(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Item {} not found", id)));
        }
        Ok(())
    }

    /// Most recently created items, newest first, with their category names
    pub async fn latest_items(&self, limit: i64) -> Result<Vec<LatestItem>, DatabaseError> {
        Ok(sqlx::query_as::<_, LatestItem>(
            "SELECT i.id, i.name, c.name AS category
             FROM items i
             JOIN categories c ON c.id = i.category_id
             ORDER BY i.created DESC, i.id DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }
}

// Export
impl CatalogRepository {
    /// Every category with its items nested, in insertion order
    pub async fn export_catalog(&self) -> Result<Vec<CategoryExport>, DatabaseError> {
        let categories_sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id ASC");
        let categories = sqlx::query_as::<_, Category>(&categories_sql)
            .fetch_all(&self.pool)
            .await?;

        let items_sql = format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY id ASC");
        let mut items = sqlx::query_as::<_, Item>(&items_sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(categories
            .into_iter()
            .map(|category| {
                let (mine, rest): (Vec<Item>, Vec<Item>) =
                    items.drain(..).partition(|item| item.category_id == category.id);
                items = rest;
                CategoryExport { category, items: mine }
            })
            .collect())
    }
}
