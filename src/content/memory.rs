//! In-process content store.
//!
//! Applies the same filter / order / limit / select semantics as the
//! delivery API over items held in memory, and keeps a log of every query
//! it answered. Used as the test double for the service and the routes.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use super::models::parse_content_date;
use super::query::EntryQuery;
use super::store::ContentStore;
use crate::error::{ContentError, Result};

#[derive(Debug, Default)]
pub struct MemoryStore {
    name: String,
    items: HashMap<String, Vec<Value>>,
    unavailable: bool,
    log: Mutex<Vec<EntryQuery>>,
}

impl MemoryStore {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// A store that fails every call, as an unreachable CMS would.
    pub fn unavailable(name: &str) -> Self {
        Self {
            unavailable: true,
            ..Self::new(name)
        }
    }

    /// Adds an item (wire shape, links already resolved) under a content type.
    pub fn with_item(mut self, content_type: &str, item: Value) -> Self {
        self.items
            .entry(content_type.to_string())
            .or_default()
            .push(item);
        self
    }

    /// Every query received so far, oldest first.
    pub fn queries(&self) -> Vec<EntryQuery> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    fn record(&self, query: &EntryQuery) {
        if let Ok(mut log) = self.log.lock() {
            log.push(query.clone());
        }
    }
}

fn field<'a>(item: &'a Value, name: &str) -> Option<&'a Value> {
    item.get("fields").and_then(|f| f.get(name))
}

fn matches_filter(item: &Value, name: &str, expected: &str) -> bool {
    match field(item, name) {
        Some(Value::String(s)) => s == expected,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == expected,
    }
}

fn compare_field(a: &Value, b: &Value, name: &str) -> Ordering {
    let (a, b) = (field(a, name), field(b, name));
    let as_date = |v: Option<&Value>| v.and_then(Value::as_str).and_then(parse_content_date);
    match (as_date(a), as_date(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => {
            let text = |v: Option<&Value>| v.map(|v| v.to_string()).unwrap_or_default();
            text(a).cmp(&text(b))
        }
    }
}

fn project(item: &Value, select: &[String]) -> Value {
    let mut fields = Map::new();
    for name in select {
        if let Some(value) = field(item, name) {
            fields.insert(name.clone(), value.clone());
        }
    }
    let mut out = Map::new();
    out.insert("sys".to_string(), item.get("sys").cloned().unwrap_or(Value::Null));
    out.insert("fields".to_string(), Value::Object(fields));
    Value::Object(out)
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn get_entries(&self, query: &EntryQuery) -> Result<Vec<Value>> {
        self.record(query);
        if self.unavailable {
            return Err(ContentError::remote(format!("{} store unavailable", self.name)));
        }

        let mut items: Vec<Value> = self
            .items
            .get(&query.content_type)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| {
                        query
                            .filters
                            .iter()
                            .all(|(name, value)| matches_filter(item, name, value))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            items.sort_by(|a, b| {
                let ord = compare_field(a, b, &order.field);
                if order.descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        if let Some(limit) = query.limit {
            items.truncate(limit as usize);
        }

        if !query.select.is_empty() {
            items = items.iter().map(|item| project(item, &query.select)).collect();
        }

        Ok(items)
    }

    async fn ping(&self) -> Result<()> {
        if self.unavailable {
            return Err(ContentError::remote(format!("{} store unavailable", self.name)));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::query::BLOG_POST;
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::new("published")
            .with_item(BLOG_POST, json!({ "sys": { "id": "1" }, "fields": { "slug": "a", "publishDate": "2024-01-01", "featured": true } }))
            .with_item(BLOG_POST, json!({ "sys": { "id": "2" }, "fields": { "slug": "b", "publishDate": "2024-06-01T08:00:00Z", "featured": false } }))
            .with_item(BLOG_POST, json!({ "sys": { "id": "3" }, "fields": { "slug": "c", "publishDate": "2023-12-31" } }))
    }

    fn slugs(items: &[Value]) -> Vec<&str> {
        items
            .iter()
            .map(|i| i["fields"]["slug"].as_str().unwrap_or_default())
            .collect()
    }

    #[tokio::test]
    async fn test_orders_by_parsed_dates_across_formats() {
        let items = store()
            .get_entries(&EntryQuery::new(BLOG_POST).newest_first("publishDate"))
            .await
            .unwrap();
        assert_eq!(slugs(&items), vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_filters_booleans_and_limits() {
        let s = store();
        let featured = s
            .get_entries(&EntryQuery::new(BLOG_POST).field_eq("featured", true))
            .await
            .unwrap();
        assert_eq!(slugs(&featured), vec!["a"]);

        let limited = s.get_entries(&EntryQuery::new(BLOG_POST).limit(1)).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_select_keeps_only_requested_fields() {
        let items = store()
            .get_entries(&EntryQuery::new(BLOG_POST).select("slug"))
            .await
            .unwrap();
        assert_eq!(items[0]["sys"]["id"], "1");
        assert!(items[0]["fields"].get("publishDate").is_none());
    }

    #[tokio::test]
    async fn test_records_queries_and_fails_when_unavailable() {
        let s = MemoryStore::unavailable("preview");
        let query = EntryQuery::new(BLOG_POST);
        assert!(s.get_entries(&query).await.is_err());
        assert!(s.ping().await.is_err());
        assert_eq!(s.queries(), vec![query]);
    }
}
