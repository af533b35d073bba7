//! URL builders shared by redirects and rendered links.

use url::form_urlencoded::byte_serialize;

use crate::database::models::{Category, Item};

pub const CATALOG: &str = "/catalog";
pub const LOGIN: &str = "/login";
pub const NEW_CATEGORY: &str = "/catalog/category/new";
pub const NEW_ITEM: &str = "/catalog/item/new";

/// Percent-encode one path segment
fn segment(raw: &str) -> String {
    // byte_serialize escapes a literal '+' as %2B, so any '+' left is a space
    byte_serialize(raw.as_bytes()).collect::<String>().replace('+', "%20")
}

fn category_base(category: &Category) -> String {
    format!("{}/{}/{}", CATALOG, segment(&category.name), category.id)
}

pub fn category_items(category: &Category) -> String {
    format!("{}/items", category_base(category))
}

pub fn edit_category(category: &Category) -> String {
    format!("{}/edit", category_base(category))
}

pub fn delete_category(category: &Category) -> String {
    format!("{}/delete", category_base(category))
}

pub fn new_item_in(category: &Category) -> String {
    format!("{}/item/new", category_base(category))
}

pub fn item_detail(category_name: &str, item: &Item) -> String {
    item_detail_by_id(category_name, &item.name, item.id)
}

pub fn item_detail_by_id(category_name: &str, item_name: &str, item_id: i64) -> String {
    format!("{}/{}/{}/{}", CATALOG, segment(category_name), segment(item_name), item_id)
}

pub fn item_json(category_name: &str, item: &Item) -> String {
    format!("{}/JSON", item_detail(category_name, item))
}

pub fn edit_item(category_name: &str, item: &Item) -> String {
    format!("{}/edit", item_detail(category_name, item))
}

pub fn delete_item(category_name: &str, item: &Item) -> String {
    format!("{}/delete", item_detail(category_name, item))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_names_as_path_segments() {
        let category = Category { id: 4, name: "Men's Shirts & Ties".to_string(), user_id: 1 };
        assert_eq!(
            category_items(&category),
            "/catalog/Men%27s%20Shirts%20%26%20Ties/4/items"
        );
        assert_eq!(item_detail_by_id("A+B", "x/y", 9), "/catalog/A%2BB/x%2Fy/9");
    }
}
