//! Datastore Queries

use serde_json::Value;

/// Page size used when a page is requested without a limit.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Equality filters plus 1-based paging, after json-server's `field=value`,
/// `_page` and `_limit` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    filters: Vec<(String, String)>,
    page: Option<usize>,
    limit: Option<usize>,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records on this page
    pub records: Vec<T>,

    /// Number of matching records before paging
    pub total_count: usize,
}

impl Query {
    /// A query matching every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only match records whose `field` equals `value` in string form.
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Return page `page` (1-based) of `limit` records.
    #[must_use]
    pub fn page(mut self, page: usize, limit: usize) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// Return at most `limit` records.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(super) fn matches(&self, record: &Value) -> bool {
        self.filters.iter().all(|(field, expected)| {
            record
                .get(field)
                .and_then(field_key)
                .is_some_and(|actual| actual == *expected)
        })
    }

    pub(super) fn paginate(&self, matching: Vec<&Value>) -> Page<Value> {
        let total_count = matching.len();

        let limit = match (self.page, self.limit) {
            (_, Some(limit)) => limit,
            (Some(_), None) => DEFAULT_PAGE_LIMIT,
            (None, None) => total_count,
        };
        let skip = self.page.unwrap_or(1).saturating_sub(1).saturating_mul(limit);

        Page {
            records: matching
                .into_iter()
                .skip(skip)
                .take(limit)
                .cloned()
                .collect(),
            total_count,
        }
    }
}

fn field_key(value: &Value) -> Option<String> {
    match value {
        Value::Bool(flag) => Some(flag.to_string()),
        other => super::record_id::as_key(other),
    }
}
