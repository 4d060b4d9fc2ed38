//! Request DTOs for the HTTP API
//!
//! Defines query strings and bodies accepted by the handlers.

use serde::Deserialize;

/// Default number of popular searches returned.
pub const DEFAULT_POPULAR_LIMIT: usize = 6;
/// Upper bound on `limit` for popular searches.
pub const MAX_POPULAR_LIMIT: usize = 50;
/// Default number of suggestions returned.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Query for `GET /popular-searches`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PopularQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

impl PopularQuery {
    /// Requested limit clamped to `1..=MAX_POPULAR_LIMIT`.
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_POPULAR_LIMIT)
            .clamp(1, MAX_POPULAR_LIMIT)
    }
}

/// Query for `GET /popular-searches/suggestions`
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SuggestionQuery {
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_SUGGESTION_LIMIT)
            .clamp(1, MAX_POPULAR_LIMIT)
    }
}

/// Query for `GET /courses`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    pub refresh: bool,
}

/// Request body for `POST /search-history`
#[derive(Debug, Clone, Deserialize)]
pub struct TrackSearchRequest {
    pub keyword: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TrackSearchRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.keyword.trim().is_empty() {
            return Some("Keyword cannot be empty".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popular_query_defaults_and_clamps() {
        assert_eq!(PopularQuery::default().effective_limit(), 6);
        assert_eq!(PopularQuery { limit: Some(0) }.effective_limit(), 1);
        assert_eq!(PopularQuery { limit: Some(500) }.effective_limit(), 50);
    }

    #[test]
    fn test_track_request_deserialize() {
        let json = r#"{"keyword": "plumber"}"#;
        let req: TrackSearchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.keyword, "plumber");
        assert!(req.user_id.is_none());
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_validate_blank_keyword() {
        let req = TrackSearchRequest {
            keyword: "   ".to_string(),
            user_id: Some("u1".to_string()),
        };
        assert!(req.validate().is_some());
    }
}
