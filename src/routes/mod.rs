/**
 * Routes Module
 * API route handlers and the state they share
 */

pub mod blog;
pub mod feed;
pub mod health;
pub mod portfolio;
pub mod preview;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{Settings, SiteConfig};
use crate::content::ContentService;
pub use crate::error::ErrorResponse;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub content: ContentService,
    pub site: Arc<SiteConfig>,
    pub preview_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(content: ContentService, settings: &Settings) -> Self {
        Self {
            content,
            site: Arc::new(settings.site.clone()),
            preview_secret: settings.preview_secret.as_deref().map(Arc::from),
        }
    }
}

/// List body for collection routes
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// `?category=` filter; the "All" sentinel and blank values mean no filter.
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

impl CategoryQuery {
    pub fn filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != crate::content::service::ALL_CATEGORIES)
    }
}

/// Longest value a CMS short-text (Symbol) field can hold
const MAX_SLUG_LEN: usize = 256;

/// Slugs are free-form short text in the CMS and only travel as an encoded
/// query value, so only blank, oversized or control-character input is refused.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.trim().is_empty()
        && slug.chars().count() <= MAX_SLUG_LEN
        && !slug.chars().any(char::is_control)
}

pub fn invalid_slug_response() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Invalid slug".to_string(),
            message: Some(format!(
                "Slug must be non-blank text of at most {} characters",
                MAX_SLUG_LEN
            )),
        }),
    )
        .into_response()
}
