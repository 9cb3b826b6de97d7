use anyhow::Result;
use serde_json::{json, Value};

use super::support::{TestApp, Upstream, ENRICHED_REPLY};

#[tokio::test]
async fn first_message_gets_a_session_and_topic() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let response = app
        .post_json("/api/chat", &json!({"message": "What are the fees?"}))
        .await?;
    assert_eq!(response.status(), 200);
    let reply: Value = response.json().await?;
    assert_eq!(reply["response"], ENRICHED_REPLY);
    assert_eq!(reply["topic"], "fees");
    assert_eq!(reply["error"], false);
    assert!(reply["session_id"].as_str().is_some_and(|id| !id.is_empty()));
    // System prompt plus the user's message.
    assert_eq!(app.upstream.last_message_count(), 2);
    Ok(())
}

#[tokio::test]
async fn follow_up_replays_session_history() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let first: Value = app
        .post_json("/api/chat", &json!({"message": "Do you offer internships?"}))
        .await?
        .json()
        .await?;
    let session_id = first["session_id"].as_str().unwrap();

    let second: Value = app
        .post_json(
            "/api/chat",
            &json!({"message": "How long is it?", "session_id": session_id}),
        )
        .await?
        .json()
        .await?;
    assert_eq!(second["session_id"], session_id);
    assert_eq!(app.upstream.last_message_count(), 4);
    assert_eq!(app.upstream.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn upstream_failure_degrades_to_fallback() -> Result<()> {
    let app = TestApp::spawn(Upstream::Status500).await?;
    let response = app
        .post_json("/api/chat", &json!({"message": "hello", "session_id": "visitor-1"}))
        .await?;
    assert_eq!(response.status(), 200);
    let reply: Value = response.json().await?;
    assert_eq!(reply["error"], true);
    assert_eq!(reply["session_id"], "visitor-1");
    assert!(reply["response"].as_str().is_some_and(|text| !text.is_empty()));

    // Failed turns are not remembered.
    app.upstream.set(Upstream::Valid);
    app.post_json("/api/chat", &json!({"message": "hello again", "session_id": "visitor-1"}))
        .await?;
    assert_eq!(app.upstream.last_message_count(), 2);
    Ok(())
}

#[tokio::test]
async fn blank_message_is_rejected() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    for body in [json!({}), json!({"message": "   "})] {
        let response = app.post_json("/api/chat", &body).await?;
        assert_eq!(response.status(), 400);
    }
    assert_eq!(app.upstream.calls(), 0);
    Ok(())
}
