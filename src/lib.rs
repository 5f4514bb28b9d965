//! Agency Content - read-only content access layer and HTTP API for the agency site

pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod routes;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

use crate::config::Settings;
use crate::error::ContentError;
use crate::routes::AppState;

/// Configure CORS from environment variables.
/// Uses ALLOWED_ORIGINS (comma-separated) or FRONTEND_ORIGIN.
/// Falls back to the local frontend dev server.
pub fn configure_cors() -> CorsLayer {
    let allowed_origins = std::env::var("ALLOWED_ORIGINS")
        .ok()
        .and_then(|s| {
            let origins: Vec<HeaderValue> = s
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                None
            } else {
                Some(origins)
            }
        })
        .or_else(|| {
            std::env::var("FRONTEND_ORIGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|origin| vec![origin])
        })
        .unwrap_or_else(|| {
            vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
            ]
        });

    // Credentials stay on so the preview cookie reaches the API
    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::HEAD])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    let cors = configure_cors();
    tracing::info!("CORS configured");

    Router::new()
        .route("/api/blog", get(routes::blog::list_posts))
        .route("/api/blog/categories", get(routes::blog::list_categories))
        .route("/api/blog/{slug}", get(routes::blog::get_post))
        .route("/api/blog/{slug}/metadata", get(routes::blog::get_post_metadata))
        .route("/api/portfolio", get(routes::portfolio::list_projects))
        .route("/api/portfolio/featured", get(routes::portfolio::list_featured))
        .route("/api/portfolio/categories", get(routes::portfolio::list_categories))
        .route("/api/portfolio/{slug}", get(routes::portfolio::get_project))
        .route(
            "/api/portfolio/{slug}/metadata",
            get(routes::portfolio::get_project_metadata),
        )
        .route("/api/preview", get(routes::preview::enter_preview))
        .route("/api/preview/exit", get(routes::preview::exit_preview))
        .route("/rss.xml", get(routes::feed::rss_feed))
        .route("/sitemap.xml", get(routes::feed::sitemap))
        .route("/health", get(routes::health::health_ping))
        .route("/health/detailed", get(routes::health::health_detailed))
        .route("/health/content", get(routes::health::health_content))
        .route("/health/ready", get(routes::health::health_ready))
        .with_state(state)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        // Read-only API; bodies are never expected
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(cors)
}

/// Run the server (used by main).
pub async fn run() -> Result<(), ContentError> {
    dotenvy::dotenv().ok();

    // Dropping these shuts down the background log writers
    let _log_guards = logging::init();

    routes::health::init_start_time();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "refusing to start");
            return Err(e);
        }
    };

    let content = content::service_from_settings(&settings);
    let app = create_app(AppState::new(content, &settings));

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Starting server on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
