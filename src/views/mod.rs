//! Server-rendered HTML pages.
//!
//! Every page goes through [`layout`], which renders the header (sign-in
//! state) and the pending flash messages. All interpolated text is escaped.

use crate::database::models::{Category, Item, LatestItem};
use crate::handlers::paths;

/// Page furniture shared by every view
pub struct Chrome<'a> {
    pub app_name: &'a str,
    pub username: Option<&'a str>,
    pub flashes: &'a [String],
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(chrome: &Chrome, title: &str, body: &str) -> String {
    let account = match chrome.username {
        Some(name) => format!(
            r#"<span class="user">{}</span> <a href="/logout">Logout</a>"#,
            escape(name)
        ),
        None => format!(r#"<a href="{}">Login</a>"#, paths::LOGIN),
    };

    let flashes = if chrome.flashes.is_empty() {
        String::new()
    } else {
        let items: String = chrome
            .flashes
            .iter()
            .map(|msg| format!("<li>{}</li>", escape(msg)))
            .collect();
        format!(r#"<ul class="flashes">{}</ul>"#, items)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - {app}</title>
</head>
<body>
<header><a href="{catalog}">{app}</a> {account}</header>
{flashes}
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        app = escape(chrome.app_name),
        catalog = paths::CATALOG,
        account = account,
        flashes = flashes,
        body = body,
    )
}

fn category_nav(categories: &[Category]) -> String {
    let links: String = categories
        .iter()
        .map(|c| format!(r#"<li><a href="{}">{}</a></li>"#, paths::category_items(c), escape(&c.name)))
        .collect();
    format!(r#"<nav><h2>Categories</h2><ul class="categories">{}</ul></nav>"#, links)
}

pub fn catalog_index(chrome: &Chrome, categories: &[Category], latest: &[LatestItem]) -> String {
    let mut body = String::new();
    if chrome.username.is_some() {
        body.push_str(&format!(
            r#"<p><a href="{}">Add Category</a> | <a href="{}">Add Item</a></p>"#,
            paths::NEW_CATEGORY,
            paths::NEW_ITEM
        ));
    }
    body.push_str(&category_nav(categories));

    let items: String = latest
        .iter()
        .map(|item| {
            format!(
                r#"<li><a href="{}">{}</a> <em>({})</em></li>"#,
                paths::item_detail_by_id(&item.category, &item.name, item.id),
                escape(&item.name),
                escape(&item.category)
            )
        })
        .collect();
    body.push_str(&format!(r#"<section><h2>Latest Items</h2><ul class="latest">{}</ul></section>"#, items));

    layout(chrome, "Catalog", &body)
}

pub fn category_items(
    chrome: &Chrome,
    categories: &[Category],
    category: &Category,
    items: &[Item],
    rows: i64,
    user_id: Option<i64>,
) -> String {
    let mut body = category_nav(categories);
    body.push_str(&format!("<section><h2>{} ({} items)</h2>", escape(&category.name), rows));

    if user_id == Some(category.user_id) {
        body.push_str(&format!(
            r#"<p><a href="{}">Add Item</a> | <a href="{}">Edit Category</a> | <a href="{}">Delete Category</a></p>"#,
            paths::new_item_in(category),
            paths::edit_category(category),
            paths::delete_category(category)
        ));
    }

    let list: String = items
        .iter()
        .map(|item| {
            format!(
                r#"<li><a href="{}">{}</a></li>"#,
                paths::item_detail(&category.name, item),
                escape(&item.name)
            )
        })
        .collect();
    body.push_str(&format!(r#"<ul class="items">{}</ul></section>"#, list));

    layout(chrome, &category.name, &body)
}

pub fn item_detail(chrome: &Chrome, item: &Item, category: &Category, user_id: Option<i64>) -> String {
    let mut body = format!(
        r#"<article><h2>{}</h2><p class="description">{}</p><p>Category: <a href="{}">{}</a></p><p>Added {}</p>"#,
        escape(&item.name),
        escape(item.description.as_deref().unwrap_or("")),
        paths::category_items(category),
        escape(&category.name),
        item.created.format("%Y-%m-%d %H:%M UTC")
    );

    if user_id == Some(item.user_id) {
        body.push_str(&format!(
            r#"<p><a href="{}">Edit</a> | <a href="{}">Delete</a></p>"#,
            paths::edit_item(&category.name, item),
            paths::delete_item(&category.name, item)
        ));
    }
    body.push_str(&format!(
        r#"<p><a href="{}">JSON</a></p></article>"#,
        paths::item_json(&category.name, item)
    ));

    layout(chrome, &item.name, &body)
}

pub fn new_category(chrome: &Chrome) -> String {
    let body = format!(
        r#"<h2>New Category</h2>
<form method="post" action="{}">
<label>Name <input type="text" name="name"></label>
<button type="submit">Create</button>
</form>"#,
        paths::NEW_CATEGORY
    );
    layout(chrome, "New Category", &body)
}

pub fn edit_category(chrome: &Chrome, category: &Category) -> String {
    let body = format!(
        r#"<h2>Edit Category</h2>
<form method="post" action="{}">
<label>Name <input type="text" name="name" value="{}"></label>
<button type="submit">Save</button>
<a href="{}">Cancel</a>
</form>"#,
        paths::edit_category(category),
        escape(&category.name),
        paths::CATALOG
    );
    layout(chrome, "Edit Category", &body)
}

pub fn delete_category(chrome: &Chrome, category: &Category) -> String {
    let body = format!(
        r#"<h2>Delete Category</h2>
<p>Delete {} and all of its items?</p>
<form method="post" action="{}">
<button type="submit">Delete</button>
<a href="{}">Cancel</a>
</form>"#,
        escape(&category.name),
        paths::delete_category(category),
        paths::CATALOG
    );
    layout(chrome, "Delete Category", &body)
}

/// Form used to create or edit an item
pub struct ItemForm<'a> {
    pub action: String,
    pub heading: &'a str,
    pub item: Option<&'a Item>,
    pub categories: &'a [Category],
    pub selected_category: Option<i64>,
}

pub fn item_form(chrome: &Chrome, form: &ItemForm) -> String {
    let name = form.item.map(|i| i.name.as_str()).unwrap_or("");
    let description = form.item.and_then(|i| i.description.as_deref()).unwrap_or("");

    let options: String = form
        .categories
        .iter()
        .map(|c| {
            let selected = if form.selected_category == Some(c.id) { " selected" } else { "" };
            format!(r#"<option value="{}"{}>{}</option>"#, c.id, selected, escape(&c.name))
        })
        .collect();

    let body = format!(
        r#"<h2>{heading}</h2>
<form method="post" action="{action}">
<label>Name <input type="text" name="name" value="{name}"></label>
<label>Description <textarea name="description">{description}</textarea></label>
<label>Category <select name="categories"><option value="">--</option>{options}</select></label>
<button type="submit">Save</button>
<a href="{catalog}">Cancel</a>
</form>"#,
        heading = escape(form.heading),
        action = escape(&form.action),
        name = escape(name),
        description = escape(description),
        options = options,
        catalog = paths::CATALOG,
    );
    layout(chrome, form.heading, &body)
}

pub fn delete_item(chrome: &Chrome, category_name: &str, item: &Item) -> String {
    let body = format!(
        r#"<h2>Delete Item</h2>
<p>Delete {} from {}?</p>
<form method="post" action="{}">
<button type="submit">Delete</button>
<a href="{}">Cancel</a>
</form>"#,
        escape(&item.name),
        escape(category_name),
        escape(&paths::delete_item(category_name, item)),
        escape(&paths::item_detail(category_name, item))
    );
    layout(chrome, "Delete Item", &body)
}

pub fn login(chrome: &Chrome, state: &str, client_id: &str) -> String {
    let body = format!(
        r#"<h2>Sign in</h2>
<div id="signin" data-state="{state}" data-client-id="{client_id}"></div>
<div id="result"></div>
<script>
function signInCallback(code) {{
  var state = document.getElementById('signin').dataset.state;
  fetch('/glogin?state=' + encodeURIComponent(state), {{
    method: 'POST',
    headers: {{ 'Content-Type': 'application/octet-stream; charset=utf-8' }},
    body: code
  }}).then(function (r) {{ return r.text(); }}).then(function (html) {{
    document.getElementById('result').innerHTML = html;
    setTimeout(function () {{ window.location.href = '{catalog}'; }}, 3000);
  }});
}}
</script>"#,
        state = escape(state),
        client_id = escape(client_id),
        catalog = paths::CATALOG,
    );
    layout(chrome, "Login", &body)
}

/// Fragment returned to the login page script after a successful sign-in
pub fn welcome(username: &str, picture: Option<&str>) -> String {
    let mut out = format!("<h1>Welcome, {}!</h1>", escape(username));
    if let Some(picture) = picture {
        out.push_str(&format!(
            r#"<img src="{}" style="width: 300px; height: 300px; border-radius: 150px;">"#,
            escape(picture)
        ));
    }
    out
}
