use anyhow::Result;
use serde_json::{json, Value};

use super::support::{asha_submission, TestApp, Upstream};

#[tokio::test]
async fn admin_routes_require_the_bearer_token() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    for path in [
        "/api/admin/leads",
        "/api/admin/profiles",
        "/api/analytics/summary",
        "/api/analytics/profiles",
        "/api/analytics/leads-by-source",
        "/api/analytics/leads-by-interest",
        "/api/analytics/lead-conversion",
        "/api/analytics/top-pages",
        "/api/analytics/page-views?days=7",
    ] {
        let anonymous = app.get(path).await?;
        assert_eq!(anonymous.status(), 401, "{path} open without a token");

        let wrong = app
            .client
            .get(app.url(path))
            .bearer_auth("guess")
            .send()
            .await?;
        assert_eq!(wrong.status(), 401, "{path} open with a wrong token");

        assert_eq!(app.admin_get(path).await?.status(), 200, "{path}");
    }
    Ok(())
}

#[tokio::test]
async fn summary_breaks_leads_down_by_source() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    for (name, source) in [("A", "chatbot"), ("B", "chatbot"), ("C", "website")] {
        let response = app
            .post_json(
                "/api/leads",
                &json!({"name": name, "phone": "9876543210", "interest": "SEO", "source": source}),
            )
            .await?;
        assert_eq!(response.status(), 201);
    }
    app.post_json("/api/profiles", &asha_submission("asha@x.com"))
        .await?;

    let summary: Value = app
        .admin_get("/api/analytics/summary")
        .await?
        .json()
        .await?;
    assert_eq!(summary["total_leads"], 3);
    assert_eq!(summary["new_leads"], 3);
    assert_eq!(summary["chatbot_leads"], 2);
    assert_eq!(summary["website_leads"], 1);
    assert_eq!(summary["total_profiles"], 1);
    assert_eq!(summary["total_courses"], 0);
    assert_eq!(summary["total_blogs"], 0);
    assert_eq!(
        summary["leads_by_source"],
        json!([{"source": "chatbot", "count": 2}, {"source": "website", "count": 1}])
    );

    let chatbot: Vec<Value> = app
        .admin_get("/api/admin/leads?source=chatbot&limit=1")
        .await?
        .json()
        .await?;
    assert_eq!(chatbot.len(), 1);
    Ok(())
}

#[tokio::test]
async fn profile_analytics_groups_by_stage_and_role() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    app.post_json("/api/profiles", &asha_submission("asha@x.com"))
        .await?;
    let mut second = asha_submission("devi@x.com");
    second["full_name"] = json!("Devi");
    second["career_stage"] = json!("student");
    app.post_json("/api/profiles", &second).await?;

    let analytics: Value = app
        .admin_get("/api/analytics/profiles")
        .await?
        .json()
        .await?;
    assert_eq!(analytics["total_profiles"], 2);
    assert_eq!(analytics["by_career_stage"], json!({"fresher": 1, "student": 1}));
    assert_eq!(
        analytics["top_target_roles"],
        json!([{"target_role": "SEO Specialist", "count": 2}])
    );
    assert_eq!(analytics["recent_profiles"][0]["full_name"], "Devi");
    Ok(())
}

async fn submit_lead(app: &TestApp, name: &str, interest: &str) -> Result<String> {
    let response = app
        .post_json(
            "/api/leads",
            &json!({"name": name, "phone": "9876543210", "interest": interest}),
        )
        .await?;
    assert_eq!(response.status(), 201);
    let lead: Value = response.json().await?;
    Ok(lead["id"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn lead_status_moves_through_the_pipeline() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let first = submit_lead(&app, "A", "SEO").await?;
    let second = submit_lead(&app, "B", "AI Marketing").await?;
    submit_lead(&app, "C", "SEO").await?;

    let anonymous = app
        .client
        .patch(app.url(&format!("/api/leads/{first}/status?status=contacted")))
        .send()
        .await?;
    assert_eq!(anonymous.status(), 401);

    let response = app
        .admin_patch(&format!("/api/leads/{first}/status?status=contacted"))
        .await?;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await?;
    assert_eq!(
        body,
        json!({"message": "Lead status updated", "lead_id": first, "status": "contacted"})
    );
    app.admin_patch(&format!("/api/leads/{second}/status?status=converted"))
        .await?;

    let contacted: Vec<Value> = app
        .admin_get("/api/admin/leads?status=contacted")
        .await?
        .json()
        .await?;
    assert_eq!(contacted.len(), 1);
    assert_eq!(contacted[0]["id"], first.as_str());
    assert_eq!(contacted[0]["name"], "A");

    let summary: Value = app
        .admin_get("/api/analytics/summary")
        .await?
        .json()
        .await?;
    assert_eq!(summary["total_leads"], 3);
    assert_eq!(summary["new_leads"], 1);

    let conversion: Value = app
        .admin_get("/api/analytics/lead-conversion")
        .await?
        .json()
        .await?;
    assert_eq!(conversion["total_leads"], 3);
    assert_eq!(conversion["converted_leads"], 1);
    assert_eq!(conversion["pending_leads"], 2);
    let rate = conversion["conversion_rate"].as_f64().unwrap();
    assert!((rate - 33.3).abs() < 1e-9, "rate {rate}");
    assert_eq!(
        conversion["leads_by_status"],
        json!([
            {"status": "new", "count": 1},
            {"status": "contacted", "count": 1},
            {"status": "converted", "count": 1},
            {"status": "lost", "count": 0}
        ])
    );
    let trend = conversion["leads_trend"].as_array().unwrap();
    assert_eq!(trend.len(), 7);
    assert_eq!(trend[6]["count"], 3);
    Ok(())
}

#[tokio::test]
async fn lead_status_rejects_unknown_leads_and_states() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let lead = submit_lead(&app, "A", "SEO").await?;

    let missing = app
        .admin_patch("/api/leads/no-such-lead/status?status=lost")
        .await?;
    assert_eq!(missing.status(), 404);
    let body: Value = missing.json().await?;
    assert_eq!(body["detail"], "Lead not found");

    let invalid = app
        .admin_patch(&format!("/api/leads/{lead}/status?status=won"))
        .await?;
    assert_eq!(invalid.status(), 400);
    let body: Value = invalid.json().await?;
    assert_eq!(body["fields"], json!(["status"]));

    let absent = app.admin_patch(&format!("/api/leads/{lead}/status")).await?;
    assert_eq!(absent.status(), 400);

    let stored: Vec<Value> = app.admin_get("/api/admin/leads").await?.json().await?;
    assert_eq!(stored[0]["status"], "new");
    Ok(())
}

#[tokio::test]
async fn lead_breakdowns_rank_sources_and_interests() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    submit_lead(&app, "A", "SEO").await?;
    submit_lead(&app, "B", "AI Marketing").await?;
    submit_lead(&app, "C", "SEO").await?;

    let interests: Value = app
        .admin_get("/api/analytics/leads-by-interest")
        .await?
        .json()
        .await?;
    assert_eq!(
        interests,
        json!([{"interest": "SEO", "count": 2}, {"interest": "AI Marketing", "count": 1}])
    );
    let sources: Value = app
        .admin_get("/api/analytics/leads-by-source")
        .await?
        .json()
        .await?;
    assert_eq!(sources, json!([{"source": "website", "count": 3}]));
    Ok(())
}

#[tokio::test]
async fn page_analytics_rank_paths_and_fill_the_trend() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    for path in ["/courses", "/courses", "/blog", "/"] {
        let response = app
            .post_json("/api/track/pageview", &json!({"path": path, "session_id": "s1"}))
            .await?;
        assert_eq!(response.status(), 202);
    }

    let top: Value = app.admin_get("/api/analytics/top-pages").await?.json().await?;
    assert_eq!(
        top,
        json!([
            {"path": "/courses", "views": 2},
            {"path": "/", "views": 1},
            {"path": "/blog", "views": 1}
        ])
    );

    let week: Vec<Value> = app
        .admin_get("/api/analytics/page-views?days=7")
        .await?
        .json()
        .await?;
    assert_eq!(week.len(), 7);
    assert_eq!(week[6]["views"], 4);
    assert!(week[..6].iter().all(|day| day["views"] == 0));
    assert!(week[0]["date"].as_str().is_some_and(|date| date.len() == 10));

    let default: Vec<Value> = app
        .admin_get("/api/analytics/page-views")
        .await?
        .json()
        .await?;
    assert_eq!(default.len(), 7);
    let capped: Vec<Value> = app
        .admin_get("/api/analytics/page-views?days=1000")
        .await?
        .json()
        .await?;
    assert_eq!(capped.len(), 90);
    Ok(())
}
