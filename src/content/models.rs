//! Content models - typed projections of CMS entries.
//!
//! Items keep the store's wire shape (`sys` + `fields`) so consumers address
//! them the same way the CMS does. Every nested reference is optional: links
//! the store could not resolve decode as `None`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// System metadata carried by every entry and asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sys {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<F> {
    pub sys: Sys,
    pub fields: F,
}

pub type Asset = Entry<AssetFields>;
pub type Author = Entry<AuthorFields>;
pub type SeoMetadata = Entry<SeoFields>;
pub type BlogPost = Entry<BlogPostFields>;
pub type PortfolioProject = Entry<PortfolioProjectFields>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFile {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<AssetFile>,
}

impl Asset {
    /// Delivery URL with a scheme, if the asset has a file.
    pub fn url(&self) -> Option<String> {
        self.fields
            .file
            .as_ref()
            .and_then(|f| normalize_asset_url(&f.url))
    }
}

/// Turns the store's asset URL into an absolute `https` URL.
///
/// The delivery API hands out protocol-relative URLs (`//images.example/..`).
/// Absolute URLs pass through untouched; blank input yields `None`.
pub fn normalize_asset_url(raw: &str) -> Option<String> {
    let url = raw.trim();
    if url.is_empty() {
        return None;
    }
    if let Some(rest) = url.strip_prefix("//") {
        return Some(format!("https://{}", rest));
    }
    Some(url.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorFields {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Post body: markdown text, or a rich-text document kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostBody {
    Markdown(String),
    RichText(serde_json::Value),
}

impl Default for PostBody {
    fn default() -> Self {
        PostBody::Markdown(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostFields {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: PostBody,
    #[serde(with = "content_date")]
    pub publish_date: DateTime<Utc>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub read_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_metadata: Option<SeoMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<Asset>,
}

impl BlogPost {
    pub fn image_url(&self) -> Option<String> {
        self.fields.featured_image.as_ref().and_then(Asset::url)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioProjectFields {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub detailed_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<Asset>,
    #[serde(default)]
    pub project_images: Vec<Asset>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(with = "content_date")]
    pub project_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_metadata: Option<SeoMetadata>,
}

impl PortfolioProject {
    pub fn image_url(&self) -> Option<String> {
        self.fields.featured_image.as_ref().and_then(Asset::url)
    }

    /// Long description split on line breaks, blank paragraphs dropped.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.fields
            .detailed_description
            .split('\n')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Gallery URLs, skipping images without a file.
    pub fn gallery_urls(&self) -> Vec<String> {
        self.fields.project_images.iter().filter_map(Asset::url).collect()
    }
}

/// Parses the date forms the CMS emits for Date fields.
pub fn parse_content_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Minute precision, as produced by the web app's date picker.
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    // No offset: read as UTC.
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

mod content_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_content_date(&raw)
            .ok_or_else(|| D::Error::custom(format!("unrecognised date: {}", raw)))
    }
}
