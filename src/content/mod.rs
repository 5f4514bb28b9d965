//! Content Access Layer - typed, read-only queries against the headless CMS.

pub mod delivery;
pub mod links;
#[cfg(test)]
pub mod memory;
pub mod models;
pub mod query;
pub mod seo;
pub mod service;
pub mod store;

pub use delivery::DeliveryClient;
pub use models::{BlogPost, PortfolioProject};
pub use service::ContentService;
pub use store::ContentStore;

use std::sync::Arc;

use crate::config::Settings;

/// Builds the published and preview clients once for the whole process.
pub fn service_from_settings(settings: &Settings) -> ContentService {
    let published = DeliveryClient::new("published", &settings.published);
    let preview = DeliveryClient::new("preview", &settings.preview);
    tracing::info!(
        space = %settings.published.space_id,
        environment = %settings.published.environment,
        "content store clients initialized"
    );
    ContentService::new(Arc::new(published), Arc::new(preview))
}
