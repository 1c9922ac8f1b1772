//! Token exchange and the operational endpoints
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{send, TestContext, TEST_PASSWORD};
use serde_json::json;

#[actix_web::test]
async fn test_token_exchange_yields_usable_token() {
    let ctx = TestContext::new();
    ctx.user("leo").await;
    let app = ctx.app().await;

    let req = test::TestRequest::post()
        .uri("/api/v1/api-token-auth/")
        .set_json(json!({"username": "leo", "password": TEST_PASSWORD}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    for scheme in ["Bearer", "Token"] {
        let req = test::TestRequest::get()
            .uri("/api/v1/posts/")
            .insert_header(("Authorization", format!("{scheme} {token}")))
            .to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::OK, "{scheme}");
    }
}

#[actix_web::test]
async fn test_bad_credentials_are_rejected() {
    let ctx = TestContext::new();
    ctx.user("leo").await;
    let app = ctx.app().await;

    for payload in [
        json!({"username": "leo", "password": "wrong-password"}),
        json!({"username": "nobody", "password": TEST_PASSWORD}),
        json!({"username": "leo"}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/api-token-auth/")
            .set_json(payload)
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.get("token").is_none());
    }
}

#[actix_web::test]
async fn test_health_and_metrics_are_public() {
    let ctx = TestContext::new();
    let app = ctx.app().await;

    for uri in ["/health", "/health/ready", "/health/live"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        assert_eq!(send(&app, req).await.0, StatusCode::OK, "{uri}");
    }

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
