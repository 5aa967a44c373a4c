//! Dictionary lookup and save API tests.

mod common;

use axum::http::{header::AUTHORIZATION, StatusCode};
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::TestContext;

fn server(ctx: &TestContext) -> TestServer {
    TestServer::new(ctx.router()).unwrap()
}

/// Test lookup holds the result and reports it.
#[tokio::test]
async fn test_lookup_known_word() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let (_, token) = ctx.sign_in();

    let response = server
        .get("/api/lookup/Serene")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["result"]["word"], "serene");
    assert_eq!(body["result"]["meanings"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["events"],
        json!([{ "type": "lookup_resolved", "word": "serene" }])
    );
}

/// Test unknown words are a 404 with the banner text.
#[tokio::test]
async fn test_lookup_unknown_word() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let (_, token) = ctx.sign_in();

    let response = server
        .get("/api/lookup/zzzzqx")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "not_found");
    assert_eq!(
        body["message"],
        "Not found: Word not found. Please try another word."
    );
    assert_eq!(
        body["events"],
        json!([{
            "type": "lookup_failed",
            "message": "Word not found. Please try another word."
        }])
    );
}

/// Test transport failures are distinguished from not-found.
#[tokio::test]
async fn test_lookup_dictionary_offline() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let (_, token) = ctx.sign_in();
    ctx.dictionary.set_offline(true);

    let response = server
        .get("/api/lookup/serene")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["message"],
        "Upstream error: Failed to look up word. Please try again."
    );
    assert_eq!(body["events"][0]["type"], "lookup_failed");
    assert_eq!(
        body["events"][0]["message"],
        "Failed to look up word. Please try again."
    );
}

/// Test a blank search term is rejected.
#[tokio::test]
async fn test_lookup_blank_term() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let (_, token) = ctx.sign_in();

    let response = server
        .get("/api/lookup/%20%20")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body.get("events").is_none());
}

/// Test saving normalizes the current lookup.
#[tokio::test]
async fn test_save_normalizes_lookup() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let (user_id, token) = ctx.sign_in();

    server
        .get("/api/lookup/serene")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/lookup")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let word = &body["word"];
    assert_eq!(word["word"], "serene");
    assert_eq!(word["display_word"], "Serene");
    assert_eq!(word["meaning"], "Calm, peaceful, and untroubled.");
    assert_eq!(word["example"], "A serene lake at dawn.");
    assert_eq!(word["synonyms"], json!(["calm", "peaceful", "tranquil"]));
    assert_eq!(word["antonyms"], json!(["agitated"]));
    assert_eq!(word["owner_id"], user_id.to_string());

    let events = body["events"].as_array().unwrap();
    let added = events.last().unwrap();
    assert_eq!(added["type"], "collection_changed");
    assert_eq!(added["change"], "added");
    assert_eq!(added["count"], 1);
    assert_eq!(ctx.store.len(), 1);
}

/// Test complex examples are replaced with a template sentence.
#[tokio::test]
async fn test_save_replaces_complex_example() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let (_, token) = ctx.sign_in();

    server
        .get("/api/lookup/ephemeral")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/lookup")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let example = body["word"]["example"].as_str().unwrap();
    assert!(example.contains("\"ephemeral\""));
    assert!(!example.contains("complex"));
}

/// Test saving without a current lookup is rejected.
#[tokio::test]
async fn test_save_without_lookup() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let (_, token) = ctx.sign_in();

    let response = server
        .post("/api/lookup")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(ctx.store.is_empty());
}

/// Test a failed insert leaves the lookup in place for a retry.
#[tokio::test]
async fn test_save_retry_after_store_failure() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let (_, token) = ctx.sign_in();

    // Load first so the injected failure hits the insert.
    server
        .get("/api/words")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await
        .assert_status_ok();
    server
        .get("/api/lookup/cat")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await
        .assert_status_ok();

    ctx.store.fail_next();
    server
        .post("/api/lookup")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await
        .assert_status(StatusCode::BAD_GATEWAY);

    server
        .post("/api/lookup")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await
        .assert_status_ok();
    assert_eq!(ctx.store.len(), 1);
}
