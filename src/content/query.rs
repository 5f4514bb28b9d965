//! Description of a single entries query against the content store.

pub const BLOG_POST: &str = "blogPost";
pub const PORTFOLIO_PROJECT: &str = "portfolioProject";

/// Default link resolution depth, matching what the pages dereference
/// (post -> author -> picture).
pub const DEFAULT_INCLUDE: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub field: String,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryQuery {
    pub content_type: String,
    /// Equality filters on field names (without the `fields.` prefix).
    pub filters: Vec<(String, String)>,
    pub order: Option<Order>,
    pub limit: Option<u32>,
    pub select: Vec<String>,
    pub include: u8,
}

impl EntryQuery {
    pub fn new(content_type: &str) -> Self {
        Self {
            content_type: content_type.to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
            select: Vec::new(),
            include: DEFAULT_INCLUDE,
        }
    }

    pub fn field_eq(mut self, field: &str, value: impl ToString) -> Self {
        self.filters.push((field.to_string(), value.to_string()));
        self
    }

    pub fn newest_first(mut self, field: &str) -> Self {
        self.order = Some(Order {
            field: field.to_string(),
            descending: true,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn select(mut self, field: &str) -> Self {
        self.select.push(field.to_string());
        self
    }

    /// Query-string pairs in the CMS delivery API dialect.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("content_type".to_string(), self.content_type.clone())];

        for (field, value) in &self.filters {
            params.push((format!("fields.{}", field), value.clone()));
        }

        if let Some(order) = &self.order {
            let sign = if order.descending { "-" } else { "" };
            params.push(("order".to_string(), format!("{}fields.{}", sign, order.field)));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        if !self.select.is_empty() {
            // sys.id is always kept so results stay identifiable.
            let mut fields = vec!["sys.id".to_string()];
            fields.extend(self.select.iter().map(|f| format!("fields.{}", f)));
            params.push(("select".to_string(), fields.join(",")));
        }

        params.push(("include".to_string(), self.include.to_string()));
        params
    }
}
