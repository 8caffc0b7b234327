mod common;

use axum::http::StatusCode;
use common::{category_titles, id_of, ids, TestApp};
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn create_links_categories_sorted_by_title() {
    let app = TestApp::spawn().await;
    let org = app.organization().await;
    let application = app.application(&org).await;
    let sports = app.category(&application, "Sports").await;
    let arts = app.category(&application, "Arts").await;

    let doc = app
        .document(&application, json!({ "categoryIds": [&sports, &arts] }))
        .await;

    assert_eq!(category_titles(&doc), vec!["Arts", "Sports"]);
    assert_eq!(doc["status"], "draft");
    assert_eq!(doc["mode"], "article");
    assert!(doc["updatedAt"].is_null());
    assert!(doc.get("categoryIds").is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn patch_replaces_category_links() {
    let app = TestApp::spawn().await;
    let org = app.organization().await;
    let application = app.application(&org).await;
    let news = app.category(&application, "News").await;
    let music = app.category(&application, "Music").await;
    let film = app.category(&application, "Film").await;

    let doc = app
        .document(&application, json!({ "categoryIds": [&news, &music] }))
        .await;
    let uri = format!("/documents/{}", id_of(&doc));

    let (status, patched) = app
        .patch(&uri, json!({ "categoryIds": [&film], "title": "Renamed" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(category_titles(&patched), vec!["Film"]);
    assert_eq!(patched["title"], "Renamed");
    assert!(patched["updatedAt"].is_string());

    // Without categoryIds the links stay as they are.
    let (_, patched) = app.patch(&uri, json!({ "excerpt": "Short" })).await;
    assert_eq!(category_titles(&patched), vec!["Film"]);
    assert_eq!(patched["excerpt"], "Short");

    let (_, patched) = app.patch(&uri, json!({ "categoryIds": [] })).await;
    assert!(category_titles(&patched).is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn undeclared_meta_keys_are_stored() {
    let app = TestApp::spawn().await;
    let org = app.organization().await;
    let application = app.application(&org).await;

    let doc = app
        .document(
            &application,
            json!({ "meta": { "title": "SEO", "customKey": 7 } }),
        )
        .await;

    let (status, fetched) = app.get(&format!("/documents/{}", id_of(&doc))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["meta"], json!({ "title": "SEO", "customKey": 7 }));
}

#[tokio::test]
#[ignore = "requires database"]
async fn patch_of_unknown_document_is_not_found() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .patch(
            "/documents/0190f3a4-8a1c-7c3e-9d2a-5b1e2f3a4b5c",
            json!({ "title": "Ghost" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_null());
}

#[tokio::test]
#[ignore = "requires database"]
async fn listing_filters_by_status() {
    let app = TestApp::spawn().await;
    let org = app.organization().await;
    let application = app.application(&org).await;

    let published = app
        .document(&application, json!({ "status": "published", "slug": "p" }))
        .await;
    app.document(&application, json!({ "slug": "d" })).await;

    let (status, list) = app
        .get(&format!("/documents?applicationId={application}&status=published"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&list), vec![id_of(&published)]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn category_filter_matches_any_listed_category() {
    let app = TestApp::spawn().await;
    let org = app.organization().await;
    let application = app.application(&org).await;
    let c1 = app.category(&application, "One").await;
    let c2 = app.category(&application, "Two").await;

    let both = app
        .document(&application, json!({ "categoryIds": [&c1, &c2] }))
        .await;
    let first = app.document(&application, json!({ "categoryIds": [&c1] })).await;
    let second = app.document(&application, json!({ "categoryIds": [&c2] })).await;
    app.document(&application, json!({})).await;

    let (_, list) = app
        .get(&format!("/documents?applicationId={application}&categoryIds%5B%5D={c1}"))
        .await;
    assert_eq!(ids(&list), vec![id_of(&both), id_of(&first)]);

    let (_, list) = app
        .get(&format!(
            "/documents?applicationId={application}&categoryIds%5B%5D={c1}&categoryIds%5B%5D={c2}"
        ))
        .await;
    assert_eq!(ids(&list), vec![id_of(&both), id_of(&first), id_of(&second)]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn ignore_list_and_title_narrow_the_listing() {
    let app = TestApp::spawn().await;
    let org = app.organization().await;
    let application = app.application(&org).await;

    let a = app.document(&application, json!({ "title": "Rust in production" })).await;
    let b = app.document(&application, json!({ "title": "rust at home" })).await;
    let c = app.document(&application, json!({ "title": "Gardening" })).await;

    let (_, list) = app
        .get(&format!(
            "/documents?applicationId={application}&ignoreDocumentIds%5B%5D={}",
            id_of(&a)
        ))
        .await;
    assert_eq!(ids(&list), vec![id_of(&b), id_of(&c)]);

    // Title matching is case-sensitive.
    let (_, list) = app
        .get(&format!("/documents?applicationId={application}&title=Rust"))
        .await;
    assert_eq!(ids(&list), vec![id_of(&a)]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn user_documents_are_scoped_and_expanded() {
    let app = TestApp::spawn().await;
    let org = app.organization().await;
    let application = app.application(&org).await;
    let author = app.user(&org, "lois").await;
    let other = app.user(&org, "jimmy").await;
    let category = app.category(&application, "City").await;

    let mine = app
        .document(
            &application,
            json!({ "userId": &author, "categoryIds": [&category], "status": "published" }),
        )
        .await;
    app.document(&application, json!({ "userId": &other })).await;

    let (status, list) = app.get(&format!("/users/{author}/documents")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&list), vec![id_of(&mine)]);
    assert_eq!(list[0]["user"]["id"], author.as_str());
    assert_eq!(category_titles(&list[0]), vec!["City"]);

    let (_, list) = app
        .get(&format!("/users/{author}/documents?status=draft"))
        .await;
    assert!(ids(&list).is_empty());

    let (status, _) = app
        .get("/users/0190f3a4-8a1c-7c3e-9d2a-5b1e2f3a4b5c/documents")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn active_revision_and_apple_news_are_attached() {
    let app = TestApp::spawn().await;
    let org = app.organization().await;
    let application = app.application(&org).await;
    let doc = app.document(&application, json!({})).await;
    let doc_id = id_of(&doc);

    let revision = app
        .create(
            "/document-revisions",
            json!({ "documentId": &doc_id, "cards": [{ "type": "text", "value": "Hi" }] }),
        )
        .await;
    let (_, patched) = app
        .patch(
            &format!("/documents/{doc_id}"),
            json!({ "activeRevisionId": &revision }),
        )
        .await;
    assert_eq!(patched["activeRevision"]["cards"][0]["value"], "Hi");

    app.create(
        "/apple-news",
        json!({
            "articleId": "an-1",
            "articleJson": { "version": 1 },
            "articleRevision": "r1",
            "documentId": &doc_id
        }),
    )
    .await;

    let (status, articles) = app.get(&format!("/documents/{doc_id}/apple-news")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(articles[0]["articleJson"]["version"], 1);
    assert_eq!(articles[0]["document"]["id"], doc_id.as_str());

    let (status, _) = app
        .get("/documents/0190f3a4-8a1c-7c3e-9d2a-5b1e2f3a4b5c/apple-news")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn unknown_category_is_a_bad_request() {
    let app = TestApp::spawn().await;
    let org = app.organization().await;
    let application = app.application(&org).await;

    let (status, body) = app
        .post(
            "/documents",
            json!({
                "applicationId": &application,
                "title": "Orphan",
                "slug": "orphan",
                "meta": {},
                "categoryIds": ["0190f3a4-8a1c-7c3e-9d2a-5b1e2f3a4b5c"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["statusCode"], 400);

    // The insert was rolled back with the failed link.
    let (_, list) = app
        .get(&format!("/documents?applicationId={application}"))
        .await;
    assert!(ids(&list).is_empty());
}
