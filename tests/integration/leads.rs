use anyhow::Result;
use serde_json::{json, Value};

use super::support::{TestApp, Upstream};

#[tokio::test]
async fn lead_with_email_is_stored_as_new() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let response = app
        .post_json(
            "/api/leads",
            &json!({
                "name": "Ravi",
                "email": "ravi@example.com",
                "phone": "+91 98765 43210",
                "interest": "SEO",
                "source": "chatbot"
            }),
        )
        .await?;
    assert_eq!(response.status(), 201);
    let lead: Value = response.json().await?;
    assert_eq!(lead["email"], "ravi@example.com");
    assert_eq!(lead["email_synthesized"], false);
    assert_eq!(lead["status"], "new");
    assert_eq!(lead["source"], "chatbot");
    assert!(lead["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(app.upstream.calls(), 0, "leads never reach the generator");
    Ok(())
}

#[tokio::test]
async fn phone_only_lead_gets_synthesized_email_and_default_source() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let response = app
        .post_json(
            "/api/leads",
            &json!({"name": "Meera", "phone": "+91 98765-43210", "interest": "Social Media"}),
        )
        .await?;
    assert_eq!(response.status(), 201);
    let lead: Value = response.json().await?;
    assert_eq!(lead["email"], "919876543210@leads.skillax.in");
    assert_eq!(lead["email_synthesized"], true);
    assert_eq!(lead["source"], "website");
    Ok(())
}

#[tokio::test]
async fn missing_phone_is_rejected_with_field_name() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let response = app
        .post_json("/api/leads", &json!({"name": "Ravi", "interest": "SEO"}))
        .await?;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body["fields"], json!(["phone"]));
    assert!(body["detail"].as_str().unwrap().contains("phone"));
    Ok(())
}

#[tokio::test]
async fn malformed_email_is_not_replaced() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let response = app
        .post_json(
            "/api/leads",
            &json!({"name": "Ravi", "email": "not-an-email", "phone": "9876543210", "interest": "SEO"}),
        )
        .await?;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body["fields"], json!(["email"]));
    Ok(())
}

#[tokio::test]
async fn unparseable_body_is_a_bad_request() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let response = app
        .client
        .post(app.url("/api/leads"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(response.status(), 400);
    Ok(())
}

#[tokio::test]
async fn contact_form_is_stored_as_contact_lead() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let response = app
        .post_json(
            "/api/contact",
            &json!({
                "name": "Anil",
                "email": "anil@example.com",
                "phone": "9876500000",
                "subject": "Batch timings",
                "message": "When does the next weekend batch start?"
            }),
        )
        .await?;
    assert_eq!(response.status(), 201);
    let accepted: Value = response.json().await?;
    let lead_id = accepted["lead_id"].as_str().unwrap().to_string();

    let leads: Vec<Value> = app
        .admin_get("/api/admin/leads?source=contact_form")
        .await?
        .json()
        .await?;
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0]["id"], lead_id.as_str());
    assert_eq!(leads[0]["interest"], "Batch timings");
    Ok(())
}

#[tokio::test]
async fn contact_form_requires_email() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let response = app
        .post_json(
            "/api/contact",
            &json!({"name": "Anil", "phone": "9876500000", "subject": "Fees"}),
        )
        .await?;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body["fields"], json!(["email"]));
    Ok(())
}
