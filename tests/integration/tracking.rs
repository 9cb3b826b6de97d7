use anyhow::Result;
use serde_json::{json, Value};

use super::support::{TestApp, Upstream};

#[tokio::test]
async fn page_views_are_accepted_and_counted() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let views = [
        json!({"path": "/courses", "session_id": "s-1", "referrer": "https://google.com"}),
        json!({"path": "/blog", "session_id": "s-1"}),
        json!({"path": "/", "session_id": "s-2"}),
        json!({}),
    ];
    for view in &views {
        let response = app.post_json("/api/track/pageview", view).await?;
        assert_eq!(response.status(), 202);
    }

    let summary: Value = app
        .admin_get("/api/analytics/summary")
        .await?
        .json()
        .await?;
    assert_eq!(summary["total_page_views"], 4);
    assert_eq!(summary["unique_visitors"], 2);
    Ok(())
}

#[tokio::test]
async fn garbage_beacon_is_still_accepted() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let response = app
        .client
        .post(app.url("/api/track/pageview"))
        .header("content-type", "text/plain")
        .body("\u{0}\u{1}not json")
        .send()
        .await?;
    assert_eq!(response.status(), 202);
    Ok(())
}
