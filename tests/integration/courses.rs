use anyhow::Result;
use serde_json::Value;
use skillax::config::WorkspacePaths;
use skillax::course_catalog::{sample_courses, CourseCatalog};

use super::support::{asha_submission, TestApp, Upstream};

fn seed(app: &TestApp) -> Result<()> {
    let paths = WorkspacePaths::from_data_dir(app.data_dir());
    let mut courses = sample_courses();
    courses[2].active = false;
    CourseCatalog::new(paths.courses_file()).replace_all(&courses)?;
    Ok(())
}

#[tokio::test]
async fn empty_catalog_lists_nothing() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let courses: Vec<Value> = app.get("/api/courses").await?.json().await?;
    assert!(courses.is_empty());
    assert_eq!(app.get("/api/courses/ai-powered-marketing").await?.status(), 404);
    Ok(())
}

#[tokio::test]
async fn lists_active_courses_and_resolves_slugs() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    seed(&app)?;

    let courses: Vec<Value> = app.get("/api/courses").await?.json().await?;
    let slugs: Vec<&str> = courses.iter().filter_map(|c| c["slug"].as_str()).collect();
    assert_eq!(
        slugs,
        vec![
            "professional-digital-marketing",
            "advanced-seo-performance",
            "ai-powered-marketing"
        ]
    );

    let course: Value = app
        .get("/api/courses/ai-powered-marketing")
        .await?
        .json()
        .await?;
    assert_eq!(course["title"], "Advanced AI-Powered Marketing");
    assert_eq!(course["duration"], "2 Months");
    assert!(course["modules"][0]["topics"]
        .as_array()
        .is_some_and(|topics| !topics.is_empty()));

    let retired = app.get("/api/courses/social-media-ads-mastery").await?;
    assert_eq!(retired.status(), 404);
    let body: Value = retired.json().await?;
    assert_eq!(body["detail"], "Course not found");
    Ok(())
}

#[tokio::test]
async fn recommended_program_has_a_course_page() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    seed(&app)?;
    let profile: Value = app
        .post_json("/api/profiles", &asha_submission("asha@x.com"))
        .await?
        .json()
        .await?;
    let recommended = profile["ai_course_recommendation"].as_str().unwrap();

    let courses: Vec<Value> = app.get("/api/courses").await?.json().await?;
    assert!(courses.iter().any(|course| course["title"]
        .as_str()
        .is_some_and(|title| recommended.starts_with(title))));

    let summary: Value = app
        .admin_get("/api/analytics/summary")
        .await?
        .json()
        .await?;
    assert_eq!(summary["total_courses"], 3);
    Ok(())
}
