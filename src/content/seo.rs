//! Page metadata derived from content items.
//!
//! SEO fields set in the CMS win; otherwise the item's own title, excerpt or
//! description stand in.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::models::{Asset, BlogPost, PortfolioProject, SeoMetadata};
use crate::config::SiteConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub canonical_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_ld: Option<Value>,
}

fn seo_title(seo: Option<&SeoMetadata>) -> Option<&str> {
    seo.and_then(|s| s.fields.title.as_deref())
        .filter(|t| !t.trim().is_empty())
}

fn seo_description(seo: Option<&SeoMetadata>) -> Option<&str> {
    seo.and_then(|s| s.fields.description.as_deref())
        .filter(|d| !d.trim().is_empty())
}

fn seo_keywords(seo: Option<&SeoMetadata>) -> Vec<String> {
    seo.map(|s| s.fields.keywords.clone()).unwrap_or_default()
}

fn image_alt(image: Option<&Asset>, fallback: &str) -> Option<String> {
    image.map(|i| i.fields.title.clone().unwrap_or_else(|| fallback.to_string()))
}

pub fn post_metadata(post: &BlogPost, site: &SiteConfig) -> PageMetadata {
    let fields = &post.fields;
    let seo = fields.seo_metadata.as_ref();
    let canonical_url = format!("{}/blog/{}", site.url, fields.slug);

    PageMetadata {
        title: seo_title(seo).unwrap_or(&fields.title).to_string(),
        description: seo_description(seo).unwrap_or(&fields.excerpt).to_string(),
        keywords: seo_keywords(seo),
        image_url: post.image_url(),
        image_alt: image_alt(fields.featured_image.as_ref(), &fields.title),
        published_time: Some(fields.publish_date.to_rfc3339()),
        json_ld: Some(blog_posting_schema(post, site, &canonical_url)),
        canonical_url,
    }
}

pub fn project_metadata(project: &PortfolioProject, site: &SiteConfig) -> PageMetadata {
    let fields = &project.fields;
    let seo = fields.seo_metadata.as_ref();
    let title = seo_title(seo).unwrap_or(&fields.title);

    PageMetadata {
        title: format!("{} | {} Portfolio", title, site.name),
        description: seo_description(seo).unwrap_or(&fields.description).to_string(),
        keywords: seo_keywords(seo),
        canonical_url: format!("{}/portfolio/{}", site.url, fields.slug),
        image_url: project.image_url(),
        image_alt: image_alt(fields.featured_image.as_ref(), &fields.title),
        published_time: None,
        json_ld: None,
    }
}

/// schema.org `BlogPosting` document for a post page.
pub fn blog_posting_schema(post: &BlogPost, site: &SiteConfig, page_url: &str) -> Value {
    let fields = &post.fields;
    let published = fields.publish_date.to_rfc3339();
    let author = fields.author.as_ref();

    json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": fields.title,
        "description": fields.excerpt,
        "image": post.image_url().unwrap_or_default(),
        "datePublished": published,
        "dateModified": published,
        "author": {
            "@type": "Person",
            "name": author.map(|a| a.fields.name.as_str()).unwrap_or(&site.name),
            "image": author
                .and_then(|a| a.fields.picture.as_ref())
                .and_then(Asset::url)
                .unwrap_or_default(),
        },
        "publisher": {
            "@type": "Organization",
            "name": site.name,
            "logo": {
                "@type": "ImageObject",
                "url": format!("{}/logo.png", site.url),
            },
        },
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": page_url,
        },
        "keywords": seo_keywords(fields.seo_metadata.as_ref()).join(", "),
    })
}
