//! Read-only group endpoints
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{bearer, send, TestContext};
use serde_json::json;

#[actix_web::test]
async fn test_list_and_get_groups() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user("leo").await;
    let cats = ctx.group("cats").await;
    ctx.group("dogs").await;
    let app = ctx.app().await;

    let req = test::TestRequest::get()
        .uri("/api/v1/groups/")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/groups/{}/", cats.id))
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": cats.id, "title": "Group cats", "slug": "cats", "description": ""})
    );
}

#[actix_web::test]
async fn test_groups_are_read_only() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user("leo").await;
    let cats = ctx.group("cats").await;
    let app = ctx.app().await;

    let req = test::TestRequest::post()
        .uri("/api/v1/groups/")
        .insert_header(bearer(&token))
        .set_json(json!({"title": "New", "slug": "new"}))
        .to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::METHOD_NOT_ALLOWED);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/groups/{}/", cats.id))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn test_groups_require_token() {
    let ctx = TestContext::new();
    let app = ctx.app().await;

    let req = test::TestRequest::get().uri("/api/v1/groups/").to_request();
    assert_eq!(send(&app, req).await.0, StatusCode::UNAUTHORIZED);
}
