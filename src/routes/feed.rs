/**
 * Feed Routes
 * RSS feed and sitemap generated from published posts
 */
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, SecondsFormat, Utc};

use super::AppState;
use crate::config::SiteConfig;
use crate::content::BlogPost;

const RSS_ITEM_LIMIT: usize = 50;

/// Static pages: (path, change frequency, priority)
const STATIC_PAGES: &[(&str, &str, f32)] = &[
    ("", "weekly", 1.0),
    ("/about", "monthly", 0.8),
    ("/services", "monthly", 0.9),
    ("/portfolio", "monthly", 0.9),
    ("/blog", "weekly", 0.9),
    ("/contact", "yearly", 0.7),
];

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn rfc822(dt: &DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S +0000").to_string()
}

fn xml_response(content_type: &'static str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "public, max-age=3600, stale-while-revalidate=600"),
        ],
        body,
    )
        .into_response()
}

pub fn render_rss(site: &SiteConfig, posts: &[BlogPost]) -> String {
    let mut items = String::new();
    for post in posts.iter().take(RSS_ITEM_LIMIT) {
        let fields = &post.fields;
        let post_url = format!("{}/blog/{}", site.url, fields.slug);
        items.push_str(&format!(
            "    <item>\n\
                   <title>{}</title>\n\
                   <link>{}</link>\n\
                   <description>{}</description>\n\
                   <category>{}</category>\n\
                   <pubDate>{}</pubDate>\n\
                   <guid isPermaLink=\"true\">{}</guid>\n\
                 </item>\n",
            escape_xml(&fields.title),
            escape_xml(&post_url),
            escape_xml(&fields.excerpt),
            escape_xml(&fields.category),
            rfc822(&fields.publish_date),
            escape_xml(&post_url),
        ));
    }

    let feed_url = format!("{}/rss.xml", site.url);
    let blog_url = format!("{}/blog", site.url);

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>{}</title>
    <link>{}</link>
    <description>{}</description>
    <language>en-us</language>
    <atom:link href="{}" rel="self" type="application/rss+xml"/>
    <lastBuildDate>{}</lastBuildDate>
{}  </channel>
</rss>"#,
        escape_xml(&site.name),
        escape_xml(&blog_url),
        escape_xml(&site.description),
        escape_xml(&feed_url),
        posts
            .first()
            .map(|p| rfc822(&p.fields.publish_date))
            .unwrap_or_default(),
        items,
    )
}

pub fn render_sitemap(site: &SiteConfig, posts: &[BlogPost], now: DateTime<Utc>) -> String {
    let url = |loc: &str, lastmod: &DateTime<Utc>, freq: &str, priority: f32| {
        format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            escape_xml(loc),
            lastmod.to_rfc3339_opts(SecondsFormat::Secs, true),
            freq,
            priority
        )
    };

    let mut body = String::new();
    for (path, freq, priority) in STATIC_PAGES {
        body.push_str(&url(&format!("{}{}", site.url, path), &now, *freq, *priority));
    }
    for post in posts {
        let loc = format!("{}/blog/{}", site.url, post.fields.slug);
        body.push_str(&url(&loc, &post.fields.publish_date, "monthly", 0.8));
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</urlset>",
        body
    )
}

/// GET /rss.xml
pub async fn rss_feed(State(state): State<AppState>) -> Response {
    match state.content.all_posts(false).await {
        Ok(posts) => xml_response(
            "application/rss+xml; charset=utf-8",
            render_rss(&state.site, &posts),
        ),
        Err(e) => e.into_response(),
    }
}

/// GET /sitemap.xml
pub async fn sitemap(State(state): State<AppState>) -> Response {
    match state.content.all_posts(false).await {
        Ok(posts) => xml_response(
            "application/xml; charset=utf-8",
            render_sitemap(&state.site, &posts, Utc::now()),
        ),
        Err(e) => e.into_response(),
    }
}
