/**
 * Preview Routes
 * Draft-content mode, entered with the shared preview secret
 */
use axum::{
    extract::{FromRequestParts, Query, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::convert::Infallible;

use super::{invalid_slug_response, is_valid_slug, AppState};
use crate::error::ContentError;

pub const PREVIEW_COOKIE: &str = "content_preview";

/// Cookie value proving the preview secret was presented. The secret itself
/// never leaves the server.
pub fn preview_token(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

/// Whether the request reads draft content. Extraction never fails: a missing
/// or stale cookie simply means published content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewMode(pub bool);

impl FromRequestParts<AppState> for PreviewMode {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let enabled = match (&state.preview_secret, cookie_value(&parts.headers, PREVIEW_COOKIE)) {
            (Some(secret), Some(token)) => token == preview_token(secret),
            _ => false,
        };
        Ok(PreviewMode(enabled))
    }
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub secret: Option<String>,
    pub slug: Option<String>,
}

fn with_cookie(mut response: Response, cookie: String) -> Response {
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "invalid preview cookie header");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// GET /api/preview?secret=...&slug=...
/// Checks the secret, confirms the draft post exists, then turns preview on
/// and sends the browser to the post.
pub async fn enter_preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    let secret = match (&state.preview_secret, query.secret.as_deref()) {
        (Some(expected), Some(given)) if given == &**expected => expected.clone(),
        _ => {
            tracing::warn!("preview requested with invalid secret");
            return (StatusCode::UNAUTHORIZED, "Invalid token").into_response();
        }
    };

    let slug = match query.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => slug,
        None => return Redirect::temporary("/").into_response(),
    };

    if !is_valid_slug(slug) {
        return invalid_slug_response();
    }

    match state.content.post_by_slug(slug, true).await {
        Ok(_) => {
            tracing::info!(slug = %slug, "preview mode enabled");
            let cookie = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                PREVIEW_COOKIE,
                preview_token(&secret)
            );
            with_cookie(
                Redirect::temporary(&format!("/blog/{}", urlencoding::encode(slug))).into_response(),
                cookie,
            )
        }
        Err(ContentError::NotFound { .. }) => (StatusCode::NOT_FOUND, "Post not found").into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/preview/exit
pub async fn exit_preview() -> Response {
    let cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", PREVIEW_COOKIE);
    with_cookie(Redirect::temporary("/").into_response(), cookie)
}
