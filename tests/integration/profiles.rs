use anyhow::Result;
use serde_json::{json, Value};
use skillax::records::is_profile_code;

use super::support::{asha_submission, TestApp, Upstream};

#[tokio::test]
async fn asha_profile_is_created_enriched_and_shareable() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let response = app
        .post_json("/api/profiles", &asha_submission("asha@x.com"))
        .await?;
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await?;

    let code = created["profile_code"].as_str().unwrap().to_string();
    assert!(is_profile_code(&code), "unexpected code shape {code}");
    assert_eq!(
        created["share_url"],
        format!("https://skillax.test/profile/{code}").as_str()
    );
    assert_eq!(created["enrichment_status"], "completed");
    assert!(created["ai_bio"].as_str().is_some_and(|bio| !bio.is_empty()));
    let roadmap = created["ai_career_roadmap"].as_array().unwrap();
    assert!(!roadmap.is_empty());
    assert!(roadmap[0]["goals"]
        .as_array()
        .is_some_and(|goals| goals.iter().any(|g| g.as_str().is_some())));
    assert_eq!(
        created["ai_course_recommendation"],
        "Professional Digital Marketing (4 Months)"
    );
    assert_eq!(app.upstream.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn public_view_hides_contact_details_and_counts_views() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let created: Value = app
        .post_json("/api/profiles", &asha_submission("asha@x.com"))
        .await?
        .json()
        .await?;
    let code = created["profile_code"].as_str().unwrap();

    let first: Value = app.get(&format!("/api/profiles/{code}")).await?.json().await?;
    let second: Value = app.get(&format!("/api/profiles/{code}")).await?.json().await?;

    for view in [&first, &second] {
        let object = view.as_object().unwrap();
        for hidden in ["id", "email", "phone"] {
            assert!(!object.contains_key(hidden), "{hidden} leaked");
        }
    }
    assert_eq!(first["full_name"], "Asha Kumar");
    assert_eq!(first["ai_bio"], second["ai_bio"]);
    assert_eq!(first["interests"], json!(["Search Engine Optimization"]));
    assert_eq!(
        second["profile_views"].as_u64().unwrap(),
        first["profile_views"].as_u64().unwrap() + 1
    );
    Ok(())
}

#[tokio::test]
async fn unknown_or_malformed_codes_are_not_found() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    for code in ["SKX00000000", "not-a-code", "skxabcdefgh"] {
        let response = app.get(&format!("/api/profiles/{code}")).await?;
        assert_eq!(response.status(), 404, "code {code}");
    }
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected_without_second_upstream_call() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let first = app
        .post_json("/api/profiles", &asha_submission("asha@x.com"))
        .await?;
    assert_eq!(first.status(), 201);

    let second = app
        .post_json("/api/profiles", &asha_submission("ASHA@x.com"))
        .await?;
    assert_eq!(second.status(), 400);
    let body: Value = second.json().await?;
    assert_eq!(body["fields"], json!(["email"]));
    assert!(body["detail"]
        .as_str()
        .is_some_and(|detail| detail.contains("already exists")));
    assert_eq!(app.upstream.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn invalid_choices_and_missing_fields_are_named() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let mut submission = asha_submission("asha@x.com");
    submission["career_stage"] = json!("veteran");
    submission.as_object_mut().unwrap().remove("target_role");

    let response = app.post_json("/api/profiles", &submission).await?;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(fields.contains(&"career_stage"));
    assert!(fields.contains(&"target_role"));
    let violations = body["violations"].as_array().unwrap();
    assert!(violations
        .iter()
        .any(|v| v["field"] == "career_stage" && v["reason"] == "invalid_choice"));
    assert_eq!(app.upstream.calls(), 0);

    let profiles: Vec<Value> = app.admin_get("/api/admin/profiles").await?.json().await?;
    assert!(profiles.is_empty());
    Ok(())
}

#[tokio::test]
async fn wrongly_typed_fields_are_named() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let mut submission = asha_submission("asha@x.com");
    submission["phone"] = json!(9999999999u64);
    submission["interests"] = json!("SEO");

    let response = app.post_json("/api/profiles", &submission).await?;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body["fields"], json!(["phone", "interests"]));
    assert!(body["violations"]
        .as_array()
        .unwrap()
        .iter()
        .all(|v| v["reason"] == "invalid_format"));
    assert_eq!(app.upstream.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn sectioned_reply_yields_partial_enrichment() -> Result<()> {
    let app = TestApp::spawn(Upstream::Sections).await?;
    let created: Value = app
        .post_json("/api/profiles", &asha_submission("asha@x.com"))
        .await?
        .json()
        .await?;
    assert_eq!(created["enrichment_status"], "partial");
    assert_eq!(created["ai_linkedin_headline"], "Aspiring SEO Specialist");
    assert!(created.get("ai_career_roadmap").map_or(true, Value::is_null));
    Ok(())
}
