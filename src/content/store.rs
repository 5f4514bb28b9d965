use async_trait::async_trait;
use serde_json::Value;

use super::query::EntryQuery;
use crate::error::Result;

/// A remote (or in-process) content store answering entries queries.
///
/// Implementations return items in store order with links already resolved.
/// They hold fixed connection settings only and are shared across requests.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Runs one entries query.
    async fn get_entries(&self, query: &EntryQuery) -> Result<Vec<Value>>;

    /// Cheapest possible round trip, for health checks.
    async fn ping(&self) -> Result<()>;

    /// Label used in logs ("published", "preview", ...).
    fn name(&self) -> &str;
}
