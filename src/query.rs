//! Search query construction for both transports.
//!
//! The two transports do not share a wire shape: REST takes flat string
//! parameters with comma-joined lists, MCP takes a JSON arguments object
//! with real arrays. Both renderings come from the same [`SearchQuery`].

use serde_json::{Map, Value};
use thiserror::Error;

/// Number of results requested when the caller does not set a limit.
pub const DEFAULT_LIMIT: u32 = 5;

/// Client-side query validation failure.
///
/// The empty-query check is the only validation the client performs: an
/// empty free-text query is meaningless at the registry regardless of
/// backend, so failing before the round trip is always right. Everything
/// else (limits, score ranges) is the registry's call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A required field was empty.
    #[error("Required field '{0}' is empty")]
    EmptyField(&'static str),
}

/// Search parameters assembled per call.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    query: String,
    domain: Option<String>,
    tags: Option<Vec<String>>,
    types: Option<Vec<String>>,
    min_quality: Option<f64>,
    limit: Option<u32>,
}

impl SearchQuery {
    /// Create a query with the required free-text string.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Filter by task domain.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Filter by tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Filter by unit kinds (e.g. `ReasoningTrace`).
    #[must_use]
    pub fn with_types(mut self, types: Vec<String>) -> Self {
        self.types = Some(types);
        self
    }

    /// Minimum quality score threshold.
    #[must_use]
    pub fn with_min_quality(mut self, min_quality: f64) -> Self {
        self.min_quality = Some(min_quality);
        self
    }

    /// Maximum number of results.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The free-text query string.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Result limit, defaulting to [`DEFAULT_LIMIT`]. No upper bound is
    /// enforced here; the registry caps as it sees fit.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    fn validate(&self) -> Result<(), QueryError> {
        if self.query.trim().is_empty() {
            return Err(QueryError::EmptyField("query"));
        }
        Ok(())
    }

    /// Render REST query parameters. Absent optional filters are omitted
    /// entirely; lists are comma-joined.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyField`] when the free-text query is empty.
    /// This fires before any network call is attempted.
    pub fn rest_params(&self) -> Result<Vec<(String, String)>, QueryError> {
        self.validate()?;

        let mut params = vec![("q".to_string(), self.query.clone())];
        if let Some(domain) = &self.domain {
            params.push(("domain".to_string(), domain.clone()));
        }
        if let Some(tags) = self.tags.as_deref().filter(|t| !t.is_empty()) {
            params.push(("tags".to_string(), tags.join(",")));
        }
        if let Some(types) = self.types.as_deref().filter(|t| !t.is_empty()) {
            params.push(("types".to_string(), types.join(",")));
        }
        if let Some(min_quality) = self.min_quality {
            params.push(("min_quality".to_string(), min_quality.to_string()));
        }
        params.push(("limit".to_string(), self.limit().to_string()));
        Ok(params)
    }

    /// Render the MCP tool arguments object. Lists stay JSON arrays.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyField`] when the free-text query is empty.
    pub fn mcp_arguments(&self) -> Result<Value, QueryError> {
        self.validate()?;

        let mut arguments = Map::new();
        arguments.insert("query".to_string(), Value::from(self.query.clone()));
        if let Some(domain) = &self.domain {
            arguments.insert("domain".to_string(), Value::from(domain.clone()));
        }
        if let Some(tags) = self.tags.as_deref().filter(|t| !t.is_empty()) {
            arguments.insert("tags".to_string(), Value::from(tags.to_vec()));
        }
        if let Some(types) = self.types.as_deref().filter(|t| !t.is_empty()) {
            arguments.insert("types".to_string(), Value::from(types.to_vec()));
        }
        if let Some(min_quality) = self.min_quality {
            arguments.insert("min_quality".to_string(), Value::from(min_quality));
        }
        arguments.insert("limit".to_string(), Value::from(self.limit()));
        Ok(Value::Object(arguments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_minimal_query_renders_q_and_limit_only() {
        let params = SearchQuery::new("debugging techniques").rest_params().unwrap();
        assert_eq!(param(&params, "q"), Some("debugging techniques"));
        assert_eq!(param(&params, "limit"), Some("5"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_optional_filters_rendered_when_set() {
        let params = SearchQuery::new("debugging techniques")
            .with_domain("software_engineering")
            .with_tags(vec!["python".to_string(), "linting".to_string()])
            .with_min_quality(0.8)
            .with_limit(3)
            .rest_params()
            .unwrap();
        assert_eq!(param(&params, "domain"), Some("software_engineering"));
        assert_eq!(param(&params, "tags"), Some("python,linting"));
        assert_eq!(param(&params, "min_quality"), Some("0.8"));
        assert_eq!(param(&params, "limit"), Some("3"));
    }

    #[test]
    fn test_absent_filters_are_omitted_not_empty() {
        let params = SearchQuery::new("q").rest_params().unwrap();
        assert_eq!(param(&params, "domain"), None);
        assert_eq!(param(&params, "tags"), None);
        assert_eq!(param(&params, "types"), None);
        assert_eq!(param(&params, "min_quality"), None);
    }

    #[test]
    fn test_empty_tag_list_is_omitted() {
        let params = SearchQuery::new("q").with_tags(Vec::new()).rest_params().unwrap();
        assert_eq!(param(&params, "tags"), None);
    }

    #[test]
    fn test_empty_query_fails_fast() {
        assert_eq!(
            SearchQuery::new("").rest_params().unwrap_err(),
            QueryError::EmptyField("query")
        );
        assert_eq!(
            SearchQuery::new("   ").mcp_arguments().unwrap_err(),
            QueryError::EmptyField("query")
        );
    }

    #[test]
    fn test_mcp_arguments_keep_lists_as_arrays() {
        let arguments = SearchQuery::new("financial analysis techniques")
            .with_types(vec![
                "ReasoningTrace".to_string(),
                "ToolCallPattern".to_string(),
            ])
            .with_min_quality(0.8)
            .with_limit(5)
            .mcp_arguments()
            .unwrap();
        assert_eq!(
            arguments,
            json!({
                "query": "financial analysis techniques",
                "types": ["ReasoningTrace", "ToolCallPattern"],
                "min_quality": 0.8,
                "limit": 5,
            })
        );
    }

    #[test]
    fn test_limit_defaults_to_five() {
        assert_eq!(SearchQuery::new("q").limit(), DEFAULT_LIMIT);
        assert_eq!(SearchQuery::new("q").with_limit(20).limit(), 20);
    }
}
