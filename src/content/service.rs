//! Content Access Layer: the read operations page code calls.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use super::models::{BlogPost, PortfolioProject};
use super::query::{EntryQuery, BLOG_POST, PORTFOLIO_PROJECT};
use super::store::ContentStore;
use crate::error::{ContentError, Result};

/// Sentinel heading every category list; means "no filter" to the UI.
pub const ALL_CATEGORIES: &str = "All";

/// Slug lookups ask for one more item than they need so duplicate slugs are
/// noticed instead of silently masked.
const SLUG_LOOKUP_LIMIT: u32 = 2;

/// Holds the published and preview stores; every operation picks one by its
/// `preview` flag and issues exactly one query.
#[derive(Clone)]
pub struct ContentService {
    published: Arc<dyn ContentStore>,
    preview: Arc<dyn ContentStore>,
}

impl ContentService {
    pub fn new(published: Arc<dyn ContentStore>, preview: Arc<dyn ContentStore>) -> Self {
        Self { published, preview }
    }

    pub fn store(&self, preview: bool) -> &dyn ContentStore {
        if preview {
            self.preview.as_ref()
        } else {
            self.published.as_ref()
        }
    }

    pub async fn all_posts(&self, preview: bool) -> Result<Vec<BlogPost>> {
        let query = EntryQuery::new(BLOG_POST).newest_first("publishDate");
        self.fetch_all(&query, preview).await
    }

    pub async fn post_by_slug(&self, slug: &str, preview: bool) -> Result<BlogPost> {
        self.fetch_one(BLOG_POST, "Post", slug, preview).await
    }

    pub async fn posts_by_category(&self, category: &str, preview: bool) -> Result<Vec<BlogPost>> {
        let query = EntryQuery::new(BLOG_POST)
            .field_eq("category", category)
            .newest_first("publishDate");
        self.fetch_all(&query, preview).await
    }

    pub async fn all_categories(&self, preview: bool) -> Result<Vec<String>> {
        self.categories(BLOG_POST, preview).await
    }

    pub async fn all_projects(&self, preview: bool) -> Result<Vec<PortfolioProject>> {
        let query = EntryQuery::new(PORTFOLIO_PROJECT).newest_first("projectDate");
        self.fetch_all(&query, preview).await
    }

    pub async fn featured_projects(&self, preview: bool) -> Result<Vec<PortfolioProject>> {
        let query = EntryQuery::new(PORTFOLIO_PROJECT)
            .field_eq("featured", true)
            .newest_first("projectDate");
        self.fetch_all(&query, preview).await
    }

    pub async fn project_by_slug(&self, slug: &str, preview: bool) -> Result<PortfolioProject> {
        self.fetch_one(PORTFOLIO_PROJECT, "Project", slug, preview).await
    }

    pub async fn projects_by_category(
        &self,
        category: &str,
        preview: bool,
    ) -> Result<Vec<PortfolioProject>> {
        let query = EntryQuery::new(PORTFOLIO_PROJECT)
            .field_eq("category", category)
            .newest_first("projectDate");
        self.fetch_all(&query, preview).await
    }

    pub async fn all_project_categories(&self, preview: bool) -> Result<Vec<String>> {
        self.categories(PORTFOLIO_PROJECT, preview).await
    }

    /// Items that do not match the content model (typically incomplete
    /// drafts) are logged and left out; the rest of the list is still served.
    async fn fetch_all<T: DeserializeOwned>(&self, query: &EntryQuery, preview: bool) -> Result<Vec<T>> {
        let store = self.store(preview);
        let items = store.get_entries(query).await?;
        Ok(items
            .into_iter()
            .filter_map(|item| match decode::<T>(item) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    tracing::warn!(
                        store = %store.name(),
                        content_type = %query.content_type,
                        error = %e,
                        "skipping entry that does not match the content model"
                    );
                    None
                }
            })
            .collect())
    }

    async fn fetch_one<T: DeserializeOwned>(
        &self,
        content_type: &str,
        kind: &'static str,
        slug: &str,
        preview: bool,
    ) -> Result<T> {
        let query = EntryQuery::new(content_type)
            .field_eq("slug", slug)
            .limit(SLUG_LOOKUP_LIMIT);
        let store = self.store(preview);
        let mut items = store.get_entries(&query).await?;

        if items.len() > 1 {
            tracing::warn!(
                store = %store.name(),
                content_type = %content_type,
                slug = %slug,
                "slug matches more than one entry, using the first"
            );
        }

        if items.is_empty() {
            return Err(ContentError::not_found(kind, slug));
        }
        decode(items.swap_remove(0)).inspect_err(|e| {
            tracing::error!(store = %store.name(), error = %e, "entry does not match content model");
        })
    }

    async fn categories(&self, content_type: &str, preview: bool) -> Result<Vec<String>> {
        let query = EntryQuery::new(content_type).select("category");
        let items = self.store(preview).get_entries(&query).await?;
        Ok(distinct_categories(
            items
                .iter()
                .filter_map(|item| item.pointer("/fields/category").and_then(Value::as_str)),
        ))
    }
}

/// `"All"` followed by each category once, in first-seen order.
pub fn distinct_categories<'a>(categories: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out = vec![ALL_CATEGORIES.to_string()];
    for category in categories {
        if category.is_empty() || out.iter().any(|c| c == category) {
            continue;
        }
        out.push(category.to_string());
    }
    out
}

fn decode<T: DeserializeOwned>(item: Value) -> Result<T> {
    let id = item
        .pointer("/sys/id")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    serde_json::from_value(item)
        .map_err(|e| ContentError::remote(format!("malformed entry {}: {}", id, e)))
}
