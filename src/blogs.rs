//! Read-only blog catalog backed by `content/blogs.json`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::path::{Path, PathBuf};

use crate::records::storage::{read_record, write_record, RecordWriteOutcome};
use crate::records::StoreError;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 50;

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: String,
    pub featured_image: Option<String>,
    #[serde(default = "default_published")]
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_published() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlogQuery {
    pub category: Option<String>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

impl BlogQuery {
    pub fn page_size(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone)]
pub struct BlogCatalog {
    path: PathBuf,
}

impl BlogCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Published posts, newest first. A missing catalog file reads as empty.
    pub fn list(&self, query: &BlogQuery) -> Result<Vec<BlogPost>, StoreError> {
        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let mut posts: Vec<BlogPost> = self
            .published()?
            .into_iter()
            .filter(|post| category.map_or(true, |c| post.category == c))
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts
            .into_iter()
            .skip(query.skip.unwrap_or(0))
            .take(query.page_size())
            .collect())
    }

    pub fn get_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, StoreError> {
        Ok(self.published()?.into_iter().find(|post| post.slug == slug))
    }

    pub fn published_count(&self) -> Result<usize, StoreError> {
        Ok(self.published()?.len())
    }

    pub fn replace_all(&self, posts: &[BlogPost]) -> Result<RecordWriteOutcome, StoreError> {
        write_record(&self.path, &posts)
    }

    fn published(&self) -> Result<Vec<BlogPost>, StoreError> {
        let posts: Vec<BlogPost> = read_record(&self.path)?.unwrap_or_default();
        Ok(posts.into_iter().filter(|post| post.published).collect())
    }
}

/// Starter posts written by the setup binary.
pub fn sample_posts() -> Vec<BlogPost> {
    let now = Utc::now();
    let post = |age_days: i64, title: &str, slug: &str, excerpt: &str, category: &str, tags: &[&str]| {
        let created_at = now - Duration::days(age_days);
        BlogPost {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            slug: slug.to_string(),
            excerpt: excerpt.to_string(),
            content: excerpt.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            author: "Skillax Team".to_string(),
            featured_image: None,
            published: true,
            created_at,
            updated_at: created_at,
        }
    };
    vec![
        post(
            0,
            "10 Digital Marketing Trends to Watch",
            "digital-marketing-trends",
            "Stay ahead of the curve with the trends shaping digital marketing this year.",
            "Industry Insights",
            &["trends", "digital marketing"],
        ),
        post(
            7,
            "How to Start a Career in Digital Marketing in Kerala",
            "career-digital-marketing-kerala",
            "A practical guide to launching a digital marketing career in Kerala.",
            "Career Guide",
            &["career", "kerala", "jobs"],
        ),
        post(
            14,
            "SEO vs Social Media Marketing: Which Fits Your Business?",
            "seo-vs-social-media-marketing",
            "How SEO and social media differ, and when to invest in each.",
            "Marketing Strategy",
            &["seo", "social media", "strategy"],
        ),
    ]
}
