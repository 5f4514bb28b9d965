/**
 * Portfolio Routes
 * Read-only endpoints for portfolio projects served from the CMS
 */
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::preview::PreviewMode;
use super::{invalid_slug_response, is_valid_slug, AppState, CategoriesResponse, CategoryQuery, ListResponse};
use crate::content::{seo, PortfolioProject};
use crate::error::Result;

fn list(result: Result<Vec<PortfolioProject>>) -> Response {
    match result {
        Ok(projects) => (StatusCode::OK, Json(ListResponse::from(projects))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/portfolio - All projects, newest first, optionally `?category=`
pub async fn list_projects(
    State(state): State<AppState>,
    PreviewMode(preview): PreviewMode,
    Query(query): Query<CategoryQuery>,
) -> Response {
    list(match query.filter() {
        Some(category) => state.content.projects_by_category(category, preview).await,
        None => state.content.all_projects(preview).await,
    })
}

/// GET /api/portfolio/featured - Homepage highlights
pub async fn list_featured(
    State(state): State<AppState>,
    PreviewMode(preview): PreviewMode,
) -> Response {
    list(state.content.featured_projects(preview).await)
}

/// GET /api/portfolio/categories
pub async fn list_categories(
    State(state): State<AppState>,
    PreviewMode(preview): PreviewMode,
) -> Response {
    match state.content.all_project_categories(preview).await {
        Ok(categories) => (StatusCode::OK, Json(CategoriesResponse { categories })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/portfolio/{slug}
pub async fn get_project(
    State(state): State<AppState>,
    PreviewMode(preview): PreviewMode,
    Path(slug): Path<String>,
) -> Response {
    if !is_valid_slug(&slug) {
        return invalid_slug_response();
    }

    match state.content.project_by_slug(&slug, preview).await {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/portfolio/{slug}/metadata
pub async fn get_project_metadata(
    State(state): State<AppState>,
    PreviewMode(preview): PreviewMode,
    Path(slug): Path<String>,
) -> Response {
    if !is_valid_slug(&slug) {
        return invalid_slug_response();
    }

    match state.content.project_by_slug(&slug, preview).await {
        Ok(project) => {
            (StatusCode::OK, Json(seo::project_metadata(&project, &state.site))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::seo::PageMetadata;
    use crate::error::ErrorResponse;
    use crate::routes::test_support::{get_json, state};
    use axum::routing::get;
    use axum::Router;

    fn test_router() -> Router {
        Router::new()
            .route("/api/portfolio", get(list_projects))
            .route("/api/portfolio/featured", get(list_featured))
            .route("/api/portfolio/categories", get(list_categories))
            .route("/api/portfolio/{slug}", get(get_project))
            .route("/api/portfolio/{slug}/metadata", get(get_project_metadata))
            .with_state(state())
    }

    #[tokio::test]
    async fn test_list_projects_newest_first() {
        let (status, body) =
            get_json::<ListResponse<PortfolioProject>>(test_router(), "/api/portfolio").await;
        assert_eq!(status, StatusCode::OK);
        let slugs: Vec<_> = body.items.iter().map(|p| p.fields.slug.as_str()).collect();
        assert_eq!(slugs, vec!["gym", "bakery"]);
    }

    #[tokio::test]
    async fn test_featured_only() {
        let (_, body) =
            get_json::<ListResponse<PortfolioProject>>(test_router(), "/api/portfolio/featured").await;
        assert_eq!(body.total, 1);
        assert!(body.items.iter().all(|p| p.fields.featured));
    }

    #[tokio::test]
    async fn test_filter_and_categories() {
        let (_, body) = get_json::<ListResponse<PortfolioProject>>(
            test_router(),
            "/api/portfolio?category=Branding",
        )
        .await;
        assert_eq!(body.items[0].fields.slug, "gym");

        let (_, body) = get_json::<CategoriesResponse>(test_router(), "/api/portfolio/categories").await;
        assert_eq!(body.categories, vec!["All", "Web Design", "Branding"]);
    }

    #[tokio::test]
    async fn test_get_project_and_missing() {
        let (status, project) = get_json::<PortfolioProject>(test_router(), "/api/portfolio/bakery").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(project.paragraphs(), vec!["One.", "Two."]);

        let (status, _) = get_json::<ErrorResponse>(test_router(), "/api/portfolio/unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_project_metadata() {
        let (status, meta) =
            get_json::<PageMetadata>(test_router(), "/api/portfolio/gym/metadata").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(meta.title, "Project gym | Virts Creative Portfolio");
        assert_eq!(meta.description, "Short description");
    }
}
