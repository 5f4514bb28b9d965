//! Process configuration, read once from the environment at startup.

use crate::error::{ContentError, Result};

pub const DEFAULT_DELIVERY_URL: &str = "https://cdn.contentful.com";
pub const DEFAULT_PREVIEW_URL: &str = "https://preview.contentful.com";

/// Connection settings for one of the two CMS endpoints.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub space_id: String,
    pub environment: String,
    pub access_token: String,
}

/// Public facts about the site, used for canonical URLs and feed titles.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub url: String,
    pub name: String,
    pub description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "https://virtscreative.com".to_string(),
            name: "Virts Creative".to_string(),
            description: "Latest articles and insights".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub published: StoreConfig,
    pub preview: StoreConfig,
    /// Shared secret for `/api/preview`. Draft preview is disabled when unset.
    pub preview_secret: Option<String>,
    pub site: SiteConfig,
    pub host: String,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| {
                ContentError::Config(format!("{} must be set in the environment", key))
            })
        };

        let space_id = require("CONTENTFUL_SPACE_ID")?;
        let access_token = require("CONTENTFUL_ACCESS_TOKEN")?;
        let preview_token = require("CONTENTFUL_PREVIEW_TOKEN")?;
        let environment = get("CONTENTFUL_ENVIRONMENT").unwrap_or_else(|| "master".to_string());

        let published = StoreConfig {
            base_url: get("CONTENTFUL_DELIVERY_URL")
                .unwrap_or_else(|| DEFAULT_DELIVERY_URL.to_string()),
            space_id: space_id.clone(),
            environment: environment.clone(),
            access_token,
        };
        let preview = StoreConfig {
            base_url: get("CONTENTFUL_PREVIEW_URL")
                .unwrap_or_else(|| DEFAULT_PREVIEW_URL.to_string()),
            space_id,
            environment,
            access_token: preview_token,
        };

        let defaults = SiteConfig::default();
        let site = SiteConfig {
            url: get("SITE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.url),
            name: get("SITE_NAME").unwrap_or(defaults.name),
            description: get("SITE_DESCRIPTION").unwrap_or(defaults.description),
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ContentError::Config(format!("PORT is not a valid port: {}", raw)))?,
            None => 3001,
        };

        Ok(Self {
            published,
            preview,
            preview_secret: get("CONTENTFUL_PREVIEW_SECRET"),
            site,
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
        })
    }
}
