mod admin;
mod blogs;
mod chat;
mod courses;
mod leads;
mod profiles;
pub mod support;
mod tracking;

use anyhow::Result;
use support::{TestApp, Upstream};

#[tokio::test]
async fn banner_answers_with_and_without_trailing_slash() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    for path in ["/api", "/api/"] {
        let response = app.get(path).await?;
        assert_eq!(response.status(), 200, "banner missing at {path}");
        let body: serde_json::Value = response.json().await?;
        assert!(body["message"].as_str().is_some());
    }
    Ok(())
}
