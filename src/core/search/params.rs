//! Ordered query-string parameters

use indexmap::IndexMap;
use url::form_urlencoded;

pub const QUERY: &str = "query";
pub const PAGE: &str = "page";

/// Query-string parameters in the order they appear
///
/// Setting an existing name keeps its position; new names are appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    params: IndexMap<String, String>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without a leading `?`. A repeated name
    /// keeps its first position and its last value.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = IndexMap::new();
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            params.insert(name.into_owned(), value.into_owned());
        }
        Self { params }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.params.shift_remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Apply a new search term: `page` goes back to 1, and an empty term
    /// drops `query` instead of storing an empty value.
    pub fn apply_term(&mut self, term: &str) {
        self.set(PAGE, "1");
        if term.is_empty() {
            self.remove(QUERY);
        } else {
            self.set(QUERY, term);
        }
    }

    /// Encode as `application/x-www-form-urlencoded`, without a leading `?`
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }
}

/// Normalized list request read from the URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub page: u32,
}

impl SearchQuery {
    /// Missing query is empty; a missing, zero or unparseable page is 1
    pub fn from_params(params: &SearchParams) -> Self {
        Self {
            query: params.get(QUERY).unwrap_or_default().to_string(),
            page: params
                .get(PAGE)
                .and_then(|p| p.trim().parse::<u32>().ok())
                .filter(|p| *p >= 1)
                .unwrap_or(1),
        }
    }

    /// Canonical `query=..&page=..` form; unrelated parameters are not part
    /// of it, so it is safe to use as a cache key
    pub fn canonical(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(QUERY, &self.query)
            .append_pair(PAGE, &self.page.to_string())
            .finish()
    }
}
