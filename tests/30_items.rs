mod common;

use anyhow::Result;
use axum::http::StatusCode;

use common::{assert_redirect, body_json, body_string, location, TestApp};
use item_catalog::database::models::{Category, Item, NewItem};

async fn item(app: &TestApp, category: &Category, name: &str, owner: i64) -> Result<Item> {
    Ok(app
        .repo
        .create_item(&NewItem {
            name: name.to_string(),
            description: Some(format!("{} description", name)),
            category_id: category.id,
            user_id: owner,
        })
        .await?)
}

#[tokio::test]
async fn create_item_from_index() -> Result<()> {
    let app = TestApp::new().await?;
    let ada = app.user("Ada").await?;
    let cookie = app.signed_in(ada, "Ada")?;
    let dress = app.repo.create_category("Dress", ada).await?;

    let res = app.get("/catalog/item/new", Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let category_id = dress.id.to_string();
    let res = app
        .post_form(
            "/catalog/item/new",
            &[("name", "Modest Gown"), ("description", "Long sleeves"), ("categories", &category_id)],
            Some(&cookie),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        app.flashes_of(&res)?,
        vec!["Catalog Item 'Modest Gown' Successfully Added".to_string()]
    );

    let items = app.repo.items_in_category(dress.id).await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Modest Gown");
    assert_eq!(items[0].description.as_deref(), Some("Long sleeves"));
    assert_eq!(items[0].user_id, ada);
    assert_eq!(
        location(&res),
        Some(format!("/catalog/Dress/Modest%20Gown/{}", items[0].id).as_str())
    );
    Ok(())
}

#[tokio::test]
async fn create_item_requires_name_and_category() -> Result<()> {
    let app = TestApp::new().await?;
    let ada = app.user("Ada").await?;
    let cookie = app.signed_in(ada, "Ada")?;
    let dress = app.repo.create_category("Dress", ada).await?;

    let category_id = dress.id.to_string();
    let res = app
        .post_form("/catalog/item/new", &[("name", ""), ("categories", &category_id)], Some(&cookie))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_string(res).await?.contains("Item Name must not be blank"));

    let res = app
        .post_form("/catalog/item/new", &[("name", "Gown")], Some(&cookie))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_string(res).await?.contains("Please select a category"));

    assert_eq!(app.repo.count_items_in_category(dress.id).await?, 0);
    Ok(())
}

#[tokio::test]
async fn cannot_create_item_under_foreign_category() -> Result<()> {
    let app = TestApp::new().await?;
    let ada = app.user("Ada").await?;
    let bob = app.user("Bob").await?;
    let dress = app.repo.create_category("Dress", ada).await?;
    let cookie = app.signed_in(bob, "Bob")?;

    let category_id = dress.id.to_string();
    let res = app
        .post_form("/catalog/item/new", &[("name", "Gown"), ("categories", &category_id)], Some(&cookie))
        .await?;
    assert_redirect(&res, "/catalog");
    assert_eq!(
        app.flashes_of(&res)?,
        vec!["You did not create category Dress, hence you are not authorized to add this item: 'Gown'".to_string()]
    );

    // The category page route is refused before the form is read
    let path = format!("/catalog/Dress/{}/item/new", dress.id);
    let res = app.get(&path, Some(&cookie)).await?;
    assert_redirect(&res, "/catalog");
    let res = app.post_form(&path, &[("name", "Gown")], Some(&cookie)).await?;
    assert_redirect(&res, "/catalog");
    assert_eq!(
        app.flashes_of(&res)?,
        vec!["You did not create this category, hence you are not authorized to add an item to it".to_string()]
    );

    assert_eq!(app.repo.count_items_in_category(dress.id).await?, 0);
    Ok(())
}

#[tokio::test]
async fn create_item_from_category_page_defaults_to_that_category() -> Result<()> {
    let app = TestApp::new().await?;
    let ada = app.user("Ada").await?;
    let bob = app.user("Bob").await?;
    let cookie = app.signed_in(ada, "Ada")?;
    let dress = app.repo.create_category("Dress", ada).await?;
    let shoes = app.repo.create_category("Shoes", bob).await?;

    let path = format!("/catalog/Dress/{}/item/new", dress.id);
    let res = app.get(&path, Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.post_form(&path, &[("name", "Gown")], Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.repo.count_items_in_category(dress.id).await?, 1);

    // Selecting someone else's category is still refused
    let shoes_id = shoes.id.to_string();
    let res = app
        .post_form(&path, &[("name", "Boot"), ("categories", &shoes_id)], Some(&cookie))
        .await?;
    assert_redirect(&res, "/catalog");
    assert_eq!(
        app.flashes_of(&res)?,
        vec!["You did not create this category, hence, you are not authorized to add this item: 'Boot'"]
    );
    assert_eq!(app.repo.count_items_in_category(shoes.id).await?, 0);
    Ok(())
}

#[tokio::test]
async fn owner_edits_item_skipping_blank_fields() -> Result<()> {
    let app = TestApp::new().await?;
    let ada = app.user("Ada").await?;
    let cookie = app.signed_in(ada, "Ada")?;
    let dress = app.repo.create_category("Dress", ada).await?;
    let gowns = app.repo.create_category("Gowns", ada).await?;
    let gown = item(&app, &dress, "Gown", ada).await?;

    let path = format!("/catalog/Dress/Gown/{}/edit", gown.id);
    let res = app.get(&path, Some(&cookie)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .post_form(&path, &[("name", ""), ("description", "Updated")], Some(&cookie))
        .await?;
    assert_redirect(&res, &format!("/catalog/Dress/Gown/{}", gown.id));
    assert_eq!(
        app.flashes_of(&res)?,
        vec!["Catalog Item 'Gown' Successfully Edited".to_string()]
    );
    let stored = app.repo.get_item(gown.id).await?;
    assert_eq!(stored.name, "Gown");
    assert_eq!(stored.description.as_deref(), Some("Updated"));
    assert_eq!(stored.category_id, dress.id);

    let gowns_id = gowns.id.to_string();
    let res = app
        .post_form(&path, &[("name", "Ball Gown"), ("categories", &gowns_id)], Some(&cookie))
        .await?;
    assert_redirect(&res, &format!("/catalog/Gowns/Ball%20Gown/{}", gown.id));
    let stored = app.repo.get_item(gown.id).await?;
    assert_eq!(stored.name, "Ball Gown");
    assert_eq!(stored.category_id, gowns.id);
    Ok(())
}

#[tokio::test]
async fn item_edit_is_owner_only() -> Result<()> {
    let app = TestApp::new().await?;
    let ada = app.user("Ada").await?;
    let bob = app.user("Bob").await?;
    let dress = app.repo.create_category("Dress", ada).await?;
    let bobs = app.repo.create_category("Bob's", bob).await?;
    let gown = item(&app, &dress, "Gown", ada).await?;

    let path = format!("/catalog/Dress/Gown/{}/edit", gown.id);
    let res = app
        .post_form(&path, &[("name", "Mine now")], Some(&app.signed_in(bob, "Bob")?))
        .await?;
    assert_redirect(&res, "/catalog");
    assert_eq!(
        app.flashes_of(&res)?,
        vec!["You are not authorized to edit this item: Gown".to_string()]
    );

    // The owner cannot move the item into a category they did not create
    let bobs_id = bobs.id.to_string();
    let res = app
        .post_form(&path, &[("categories", &bobs_id)], Some(&app.signed_in(ada, "Ada")?))
        .await?;
    assert_redirect(&res, "/catalog");
    assert_eq!(
        app.flashes_of(&res)?,
        vec!["You did not create category 'Bob's', hence, you are not authorized to edit this item: 'Gown'".to_string()]
    );

    let stored = app.repo.get_item(gown.id).await?;
    assert_eq!(stored.name, "Gown");
    assert_eq!(stored.category_id, dress.id);
    Ok(())
}

#[tokio::test]
async fn delete_item_checks_item_and_category_owner() -> Result<()> {
    let app = TestApp::new().await?;
    let ada = app.user("Ada").await?;
    let bob = app.user("Bob").await?;
    let dress = app.repo.create_category("Dress", ada).await?;
    let gown = item(&app, &dress, "Gown", ada).await?;
    // Bob's item filed under Ada's category
    let stray = item(&app, &dress, "Stray", bob).await?;
    let bob_cookie = app.signed_in(bob, "Bob")?;

    let path = format!("/catalog/Dress/Gown/{}/delete", gown.id);
    let res = app.post_form(&path, &[], Some(&bob_cookie)).await?;
    assert_redirect(&res, "/catalog");
    assert_eq!(
        app.flashes_of(&res)?,
        vec!["You are not authorized to delete this item: Gown".to_string()]
    );

    let path = format!("/catalog/Dress/Stray/{}/delete", stray.id);
    let res = app.get(&path, Some(&bob_cookie)).await?;
    assert_redirect(&res, "/catalog");
    assert_eq!(
        app.flashes_of(&res)?,
        vec!["You did not create this category 'Dress', hence, you are not authorized to delete this item: 'Stray'".to_string()]
    );
    assert!(app.repo.find_item(stray.id).await?.is_some());

    let ada_cookie = app.signed_in(ada, "Ada")?;
    let path = format!("/catalog/Dress/Gown/{}/delete", gown.id);
    let res = app.get(&path, Some(&ada_cookie)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let res = app.post_form(&path, &[], Some(&ada_cookie)).await?;
    assert_redirect(&res, "/catalog");
    assert_eq!(
        app.flashes_of(&res)?,
        vec!["Catalog Item 'Gown' Successfully deleted".to_string()]
    );
    assert!(app.repo.find_item(gown.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn item_detail_and_json_are_public() -> Result<()> {
    let app = TestApp::new().await?;
    let ada = app.user("Ada").await?;
    let dress = app.repo.create_category("Dress", ada).await?;
    let gown = item(&app, &dress, "Gown", ada).await?;

    let edit_link = format!("/catalog/Dress/Gown/{}/edit", gown.id);
    let res = app.get(&format!("/catalog/Dress/Gown/{}", gown.id), None).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_string(res).await?;
    assert!(html.contains("Gown description"));
    assert!(!html.contains(&edit_link));

    let res = app
        .get(&format!("/catalog/Dress/Gown/{}", gown.id), Some(&app.signed_in(ada, "Ada")?))
        .await?;
    assert!(body_string(res).await?.contains(&edit_link));

    let res = app.get(&format!("/catalog/Dress/Gown/{}/JSON", gown.id), None).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await?;
    assert_eq!(body["id"], gown.id);
    assert_eq!(body["name"], "Gown");
    assert_eq!(body["description"], "Gown description");
    assert_eq!(body["category_id"], dress.id);
    assert_eq!(body["user_id"], ada);
    assert!(body["created"].is_string());

    let res = app.get("/catalog/Dress/Gown/999/JSON", None).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
