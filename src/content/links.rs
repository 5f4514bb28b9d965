//! Link resolution for entries-collection responses.
//!
//! The delivery API returns references as `{"sys": {"type": "Link", ...}}`
//! stubs and ships the referenced entries and assets once, in `includes`.
//! Resolution swaps each stub for its target. A stub whose target is absent
//! (unpublished, deleted, or past the include depth) becomes `null`, or is
//! dropped when it sits in an array.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

#[derive(Debug, Default, Deserialize)]
pub struct Includes {
    #[serde(default, rename = "Entry")]
    pub entries: Vec<Value>,
    #[serde(default, rename = "Asset")]
    pub assets: Vec<Value>,
}

pub struct LinkIndex<'a> {
    entries: HashMap<&'a str, &'a Value>,
    assets: HashMap<&'a str, &'a Value>,
}

impl<'a> LinkIndex<'a> {
    pub fn new(includes: &'a Includes, items: &'a [Value]) -> Self {
        Self {
            entries: index_by_id(includes.entries.iter().chain(items.iter())),
            assets: index_by_id(includes.assets.iter()),
        }
    }

    fn lookup(&self, link_type: &str, id: &str) -> Option<&'a Value> {
        let table = match link_type {
            "Entry" => &self.entries,
            "Asset" => &self.assets,
            _ => return None,
        };
        table.get(id).copied()
    }

    /// Resolves links inside `item.fields`, following at most `depth` hops.
    pub fn resolve_item(&self, item: &Value, depth: u8) -> Value {
        let mut out = item.clone();
        if let Some(fields) = item.get("fields") {
            out["fields"] = self.resolve_value(fields, depth);
        }
        out
    }

    fn resolve_value(&self, value: &Value, depth: u8) -> Value {
        match value {
            Value::Object(map) if is_link(map) => self.follow(map, depth).unwrap_or(Value::Null),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.resolve_value(v, depth)))
                    .collect(),
            ),
            Value::Array(values) => Value::Array(
                values
                    .iter()
                    .filter_map(|v| match v {
                        Value::Object(map) if is_link(map) => self.follow(map, depth),
                        other => Some(self.resolve_value(other, depth)),
                    })
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    fn follow(&self, link: &Map<String, Value>, depth: u8) -> Option<Value> {
        if depth == 0 {
            return None;
        }
        let sys = link.get("sys")?;
        let link_type = sys.get("linkType")?.as_str()?;
        let id = sys.get("id")?.as_str()?;
        let target = self.lookup(link_type, id)?;
        Some(self.resolve_item(target, depth - 1))
    }
}

fn index_by_id<'a>(values: impl Iterator<Item = &'a Value>) -> HashMap<&'a str, &'a Value> {
    let mut by_id = HashMap::new();
    for value in values {
        if let Some(id) = value.pointer("/sys/id").and_then(Value::as_str) {
            by_id.entry(id).or_insert(value);
        }
    }
    by_id
}

fn is_link(map: &Map<String, Value>) -> bool {
    map.get("sys")
        .and_then(|sys| sys.get("type"))
        .and_then(Value::as_str)
        == Some("Link")
}

/// Resolves every item of a collection against its includes.
pub fn resolve_items(items: Vec<Value>, includes: &Includes, depth: u8) -> Vec<Value> {
    let index = LinkIndex::new(includes, &items);
    items
        .iter()
        .map(|item| index.resolve_item(item, depth))
        .collect()
}
