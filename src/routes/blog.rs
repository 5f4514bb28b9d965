/**
 * Blog Routes
 * Read-only endpoints for blog posts served from the CMS
 */
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::preview::PreviewMode;
use super::{invalid_slug_response, is_valid_slug, AppState, CategoriesResponse, CategoryQuery, ListResponse};
use crate::content::{seo, BlogPost};

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/blog - All posts, newest first, optionally `?category=`
pub async fn list_posts(
    State(state): State<AppState>,
    PreviewMode(preview): PreviewMode,
    Query(query): Query<CategoryQuery>,
) -> Response {
    let result = match query.filter() {
        Some(category) => state.content.posts_by_category(category, preview).await,
        None => state.content.all_posts(preview).await,
    };

    match result {
        Ok(posts) => (StatusCode::OK, Json(ListResponse::<BlogPost>::from(posts))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/blog/categories - Category filter values, "All" first
pub async fn list_categories(
    State(state): State<AppState>,
    PreviewMode(preview): PreviewMode,
) -> Response {
    match state.content.all_categories(preview).await {
        Ok(categories) => (StatusCode::OK, Json(CategoriesResponse { categories })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/blog/{slug} - Single post
pub async fn get_post(
    State(state): State<AppState>,
    PreviewMode(preview): PreviewMode,
    Path(slug): Path<String>,
) -> Response {
    if !is_valid_slug(&slug) {
        return invalid_slug_response();
    }

    match state.content.post_by_slug(&slug, preview).await {
        Ok(post) => (StatusCode::OK, Json(post)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/blog/{slug}/metadata - Page metadata and JSON-LD for a post
pub async fn get_post_metadata(
    State(state): State<AppState>,
    PreviewMode(preview): PreviewMode,
    Path(slug): Path<String>,
) -> Response {
    if !is_valid_slug(&slug) {
        return invalid_slug_response();
    }

    match state.content.post_by_slug(&slug, preview).await {
        Ok(post) => (StatusCode::OK, Json(seo::post_metadata(&post, &state.site))).into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::memory::MemoryStore;
    use crate::content::seo::PageMetadata;
    use crate::error::ErrorResponse;
    use crate::routes::preview::{preview_token, PREVIEW_COOKIE};
    use crate::content::query::BLOG_POST;
    use crate::routes::test_support::{
        get_json, post, preview_store, send, state, state_with, PREVIEW_SECRET,
    };
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::routing::get;
    use axum::Router;

    fn router_with(state: AppState) -> Router {
        Router::new()
            .route("/api/blog", get(list_posts))
            .route("/api/blog/categories", get(list_categories))
            .route("/api/blog/{slug}", get(get_post))
            .route("/api/blog/{slug}/metadata", get(get_post_metadata))
            .with_state(state)
    }

    fn test_router() -> Router {
        router_with(state())
    }

    #[tokio::test]
    async fn test_list_posts_newest_first() {
        let (status, body) = get_json::<ListResponse<BlogPost>>(test_router(), "/api/blog").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.total, 2);
        assert_eq!(body.items[0].fields.slug, "second-post");
        assert_eq!(body.items[1].fields.slug, "first-post");
    }

    #[tokio::test]
    async fn test_list_posts_by_category() {
        let (_, body) = get_json::<ListResponse<BlogPost>>(test_router(), "/api/blog?category=Design").await;
        assert_eq!(body.total, 1);
        assert_eq!(body.items[0].fields.category, "Design");

        let (_, body) = get_json::<ListResponse<BlogPost>>(test_router(), "/api/blog?category=All").await;
        assert_eq!(body.total, 2);
    }

    #[tokio::test]
    async fn test_categories_route() {
        let (status, body) = get_json::<CategoriesResponse>(test_router(), "/api/blog/categories").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.categories, vec!["All", "Design", "Development"]);
    }

    #[tokio::test]
    async fn test_get_post_found_and_missing() {
        let (status, post) = get_json::<BlogPost>(test_router(), "/api/blog/first-post").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(post.fields.slug, "first-post");

        let (status, err) = get_json::<ErrorResponse>(test_router(), "/api/blog/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err.error, "Not found");
    }

    #[tokio::test]
    async fn test_get_post_blank_slug_is_bad_request() {
        let (status, err) = get_json::<ErrorResponse>(test_router(), "/api/blog/%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error, "Invalid slug");
    }

    #[tokio::test]
    async fn test_free_form_slugs_resolve() {
        let store = preview_store()
            .with_item(BLOG_POST, post("9", "Case_Study", "2024-02-01", "Design"))
            .with_item(BLOG_POST, post("10", "café", "2024-03-01", "Design"));
        let app = router_with(state_with(store, preview_store()));

        let (status, found) = get_json::<BlogPost>(app.clone(), "/api/blog/Case_Study").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found.fields.slug, "Case_Study");

        let (status, found) = get_json::<BlogPost>(app, "/api/blog/caf%C3%A9").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found.fields.slug, "café");
    }

    #[tokio::test]
    async fn test_drafts_need_preview_cookie() {
        let (status, _) = get_json::<ErrorResponse>(test_router(), "/api/blog/draft-post").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let request = Request::get("/api/blog/draft-post")
            .header(
                header::COOKIE,
                format!("{}={}", PREVIEW_COOKIE, preview_token(PREVIEW_SECRET)),
            )
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(test_router(), request).await;
        assert_eq!(status, StatusCode::OK);
        let post: BlogPost = serde_json::from_slice(&body).unwrap();
        assert_eq!(post.fields.slug, "draft-post");
    }

    #[tokio::test]
    async fn test_store_failure_is_bad_gateway() {
        let app = router_with(state_with(MemoryStore::unavailable("published"), preview_store()));
        let (status, err) = get_json::<ErrorResponse>(app, "/api/blog").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.error, "Content store unavailable");
    }

    #[tokio::test]
    async fn test_post_metadata() {
        let (status, meta) =
            get_json::<PageMetadata>(test_router(), "/api/blog/first-post/metadata").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(meta.canonical_url, "https://virtscreative.com/blog/first-post");
        assert_eq!(meta.image_url.as_deref(), Some("https://images.example/first-post.png"));
        assert!(meta.json_ld.is_some());
    }
}
