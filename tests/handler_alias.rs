mod common;

use axum::http::{Method, StatusCode};
use link_redirector::domain::entities::AliasId;
use link_redirector::domain::repositories::AliasRepository;

const AUTH: &str = "X-Authorization";

#[tokio::test]
async fn test_redirect_existing_alias() {
    let ctx = common::create_test_state();
    common::create_test_alias(&ctx, "docs", "https://example.com/docs").await;
    let server = common::test_server(ctx.state.clone());

    let response = server.get("/aka/docs").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/docs");
}

#[tokio::test]
async fn test_redirect_unknown_alias() {
    let ctx = common::create_test_state();
    let server = common::test_server(ctx.state.clone());

    let response = server.get("/aka/missing").await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_reserved_alias_is_rejected() {
    let ctx = common::create_test_state();
    let server = common::test_server(ctx.state.clone());

    server.get("/aka/400").await.assert_status_bad_request();

    let response = server
        .put("/aka/400")
        .add_header(AUTH, common::TEST_SECRET)
        .text("https://example.com")
        .await;
    response.assert_status_bad_request();
    assert!(ctx.aliases.list_keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_alias_is_rejected() {
    let ctx = common::create_test_state();
    let server = common::test_server(ctx.state.clone());

    let response = server.get("/aka").await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_write_without_secret() {
    let ctx = common::create_test_state();
    let server = common::test_server(ctx.state.clone());

    let response = server.put("/aka/docs").text("https://example.com").await;

    response.assert_status_unauthorized();
    assert_eq!(response.header("www-authenticate"), "X-Authorization");

    server.get("/aka/docs").await.assert_status_not_found();
}

#[tokio::test]
async fn test_write_with_wrong_secret() {
    let ctx = common::create_test_state();
    let server = common::test_server(ctx.state.clone());

    let response = server
        .post("/aka/docs")
        .add_header(AUTH, "not-the-secret")
        .text("https://example.com")
        .await;

    response.assert_status_unauthorized();
    assert!(ctx.aliases.list_keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unauthorized_write_keeps_existing_target() {
    let ctx = common::create_test_state();
    common::create_test_alias(&ctx, "docs", "https://example.com/docs").await;
    let server = common::test_server(ctx.state.clone());

    server
        .put("/aka/docs")
        .add_header(AUTH, "wrong")
        .text("https://evil.example")
        .await
        .assert_status_unauthorized();

    let response = server.get("/aka/docs").await;
    assert_eq!(response.header("location"), "https://example.com/docs");
}

#[tokio::test]
async fn test_writes_disabled_without_configured_secret() {
    let ctx = common::create_test_state_with_secret(None);
    let server = common::test_server(ctx.state.clone());

    server
        .put("/aka/docs")
        .add_header(AUTH, "")
        .text("https://example.com")
        .await
        .assert_status_unauthorized();

    server
        .put("/aka/docs")
        .add_header(AUTH, "anything")
        .text("https://example.com")
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_publish_then_redirect() {
    let ctx = common::create_test_state();
    let server = common::test_server(ctx.state.clone());

    let response = server
        .put("/aka/docs")
        .add_header(AUTH, common::TEST_SECRET)
        .text("https://example.com/docs")
        .await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/docs");

    let response = server.get("/aka/docs").await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/docs");
}

#[tokio::test]
async fn test_second_write_overwrites() {
    let ctx = common::create_test_state();
    let server = common::test_server(ctx.state.clone());

    server
        .post("/aka/docs")
        .add_header(AUTH, common::TEST_SECRET)
        .text("https://one.example")
        .await
        .assert_status(StatusCode::FOUND);
    server
        .put("/aka/docs")
        .add_header(AUTH, common::TEST_SECRET)
        .text("https://two.example")
        .await
        .assert_status(StatusCode::FOUND);

    let response = server.get("/aka/docs").await;
    assert_eq!(response.header("location"), "https://two.example");
    assert_eq!(ctx.aliases.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_body_is_stored_verbatim() {
    let ctx = common::create_test_state();
    let server = common::test_server(ctx.state.clone());

    server
        .put("/aka/raw")
        .add_header(AUTH, common::TEST_SECRET)
        .text("not even a url ")
        .await
        .assert_status(StatusCode::FOUND);

    let stored = ctx
        .aliases
        .get(&AliasId::parse("raw").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.url, "not even a url ");
}

#[tokio::test]
async fn test_unsendable_target_is_stored_then_fails() {
    let ctx = common::create_test_state();
    let server = common::test_server(ctx.state.clone());

    let response = server
        .put("/aka/broken")
        .add_header(AUTH, common::TEST_SECRET)
        .text("https://example.com/\nx")
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let stored = ctx
        .aliases
        .get(&AliasId::parse("broken").unwrap())
        .await
        .unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn test_head_and_delete_take_the_read_path() {
    let ctx = common::create_test_state();
    common::create_test_alias(&ctx, "docs", "https://example.com/docs").await;
    let server = common::test_server(ctx.state.clone());

    let response = server.method(Method::HEAD, "/aka/docs").await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/docs");

    let response = server.delete("/aka/docs").await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/docs");

    server.delete("/aka/missing").await.assert_status_not_found();
    assert_eq!(ctx.aliases.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_redirect_emits_event() {
    let mut ctx = common::create_test_state();
    common::create_test_alias(&ctx, "docs", "https://example.com/docs").await;
    let server = common::test_server(ctx.state.clone());

    server.get("/aka/docs").await;
    server.get("/aka/missing").await;

    let event = ctx.events.try_recv().unwrap();
    assert_eq!(event.alias, "docs");
    assert_eq!(event.partition_key, "aka");
    assert_eq!(event.row_key, "docs");
    assert_eq!(event.url, "https://example.com/docs");
    assert!(ctx.events.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_survives_closed_event_queue() {
    let ctx = common::create_test_state();
    common::create_test_alias(&ctx, "docs", "https://example.com/docs").await;
    let server = common::test_server(ctx.state.clone());
    drop(ctx.events);

    let response = server.get("/aka/docs").await;

    response.assert_status(StatusCode::FOUND);
}
