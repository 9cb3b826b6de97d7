use anyhow::Result;
use serde_json::Value;
use skillax::blogs::{sample_posts, BlogCatalog};
use skillax::config::WorkspacePaths;

use super::support::{TestApp, Upstream};

fn seed(app: &TestApp) -> Result<()> {
    let paths = WorkspacePaths::from_data_dir(app.data_dir());
    let mut posts = sample_posts();
    let mut draft = posts[1].clone();
    draft.slug = "draft-post".into();
    draft.published = false;
    posts.push(draft);
    BlogCatalog::new(paths.blogs_file()).replace_all(&posts)?;
    Ok(())
}

fn slugs(posts: &[Value]) -> Vec<&str> {
    posts.iter().filter_map(|post| post["slug"].as_str()).collect()
}

#[tokio::test]
async fn empty_catalog_lists_nothing() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let posts: Vec<Value> = app.get("/api/blogs").await?.json().await?;
    assert!(posts.is_empty());
    Ok(())
}

#[tokio::test]
async fn lists_published_posts_with_filters_and_paging() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    seed(&app)?;

    let all: Vec<Value> = app.get("/api/blogs").await?.json().await?;
    assert_eq!(
        slugs(&all),
        vec![
            "digital-marketing-trends",
            "career-digital-marketing-kerala",
            "seo-vs-social-media-marketing"
        ]
    );

    let page: Vec<Value> = app.get("/api/blogs?limit=1&skip=1").await?.json().await?;
    assert_eq!(slugs(&page), vec!["career-digital-marketing-kerala"]);

    let guides: Vec<Value> = app
        .get("/api/blogs?category=Career%20Guide")
        .await?
        .json()
        .await?;
    assert_eq!(slugs(&guides), vec!["career-digital-marketing-kerala"]);
    Ok(())
}

#[tokio::test]
async fn fetches_by_slug_but_hides_drafts() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    seed(&app)?;

    let post: Value = app
        .get("/api/blogs/seo-vs-social-media-marketing")
        .await?
        .json()
        .await?;
    assert_eq!(post["category"], "Marketing Strategy");

    assert_eq!(app.get("/api/blogs/draft-post").await?.status(), 404);
    assert_eq!(app.get("/api/blogs/missing").await?.status(), 404);
    Ok(())
}

#[tokio::test]
async fn bad_paging_parameters_are_rejected() -> Result<()> {
    let app = TestApp::spawn(Upstream::Valid).await?;
    let response = app.get("/api/blogs?limit=many").await?;
    assert_eq!(response.status(), 400);
    Ok(())
}
