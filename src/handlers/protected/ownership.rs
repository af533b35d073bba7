use std::fmt;

use crate::database::models::{Category, Item};

/// A failed owner check and the message shown to the user
#[derive(Debug)]
pub enum Denial<'a> {
    EditCategory(&'a Category),
    DeleteCategory(&'a Category),
    /// Adding an item from a category page the user does not own
    AddItemTo(&'a Category),
    /// Filing a new item under someone else's category
    FileItem { category: &'a Category, item: &'a str },
    /// Filing from a category page into another category the user does not own
    AddItemHere { item: &'a str },
    /// Moving an item into someone else's category
    MoveItem { category: &'a Category, item: &'a str },
    EditItem(&'a Item),
    DeleteItem(&'a Item),
    /// Deleting an item whose category belongs to someone else
    DeleteItemIn { category: &'a Category, item: &'a Item },
}

impl fmt::Display for Denial<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::EditCategory(c) => write!(f, "You are not authorized to edit this category: {}", c.name),
            Denial::DeleteCategory(c) => write!(f, "You are not authorized to delete this category: {}", c.name),
            Denial::AddItemTo(_) => write!(
                f,
                "You did not create this category, hence you are not authorized to add an item to it"
            ),
            Denial::FileItem { category, item } => write!(
                f,
                "You did not create category {}, hence you are not authorized to add this item: '{}'",
                category.name, item
            ),
            Denial::AddItemHere { item } => write!(
                f,
                "You did not create this category, hence, you are not authorized to add this item: '{}'",
                item
            ),
            Denial::MoveItem { category, item } => write!(
                f,
                "You did not create category '{}', hence, you are not authorized to edit this item: '{}'",
                category.name, item
            ),
            Denial::EditItem(i) => write!(f, "You are not authorized to edit this item: {}", i.name),
            Denial::DeleteItem(i) => write!(f, "You are not authorized to delete this item: {}", i.name),
            Denial::DeleteItemIn { category, item } => write!(
                f,
                "You did not create this category '{}', hence, you are not authorized to delete this item: '{}'",
                category.name, item.name
            ),
        }
    }
}
