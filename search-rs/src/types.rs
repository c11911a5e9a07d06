//! Search types and data structures
//!
//! Public types model one request and one page of results. The `*Body`
//! types mirror the backend JSON exactly and are converted into pages by
//! the client.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SearchError};

/// Default page size for a session
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Parameters for a single page request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    term: String,
    limit: usize,
    offset: usize,
}

impl SearchQuery {
    /// Build a query, rejecting empty terms and zero limits
    pub fn new(term: impl Into<String>, limit: usize, offset: usize) -> Result<Self> {
        let term = term.into();
        if term.is_empty() {
            return Err(SearchError::EmptyTerm);
        }
        if limit == 0 {
            return Err(SearchError::InvalidQuery("limit must be greater than 0".to_string()));
        }
        Ok(Self { term, limit, offset })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Result identifier as sent by the backend (WordPress ids are numeric,
/// other sources may use strings)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultId::Number(n) => write!(f, "{}", n),
            ResultId::Text(s) => f.write_str(s),
        }
    }
}

/// Search result entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub id: ResultId,
    pub title: String,
    pub url: String,
    /// Content type label ("post", "page", ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// ISO 8601 timestamp, kept as sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Relevance in 0.0..=1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// HTML fragment, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

impl SearchResultItem {
    /// Publication date, if `date` parses as RFC 3339 or a naive ISO timestamp
    pub fn published_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            return Some(dt.date());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }

    /// Score as a whole percentage; `None` for missing or zero scores
    pub fn relevance_percent(&self) -> Option<u32> {
        self.score
            .filter(|s| *s > 0.0)
            .map(|s| (s.clamp(0.0, 1.0) * 100.0).round() as u32)
    }
}

/// One page of results as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponsePage {
    pub results: Vec<SearchResultItem>,
    pub total_results: usize,
    /// Server pagination flag; `None` when the backend omitted it
    pub has_next_page: Option<bool>,
    /// Backend answered from its degraded implementation
    pub fallback: bool,
}

/// Success body of `GET /api/search`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResponseBody {
    pub results: Vec<SearchResultItem>,
    pub total_results: usize,
    #[serde(default)]
    pub pagination: Option<PaginationBody>,
    #[serde(default)]
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaginationBody {
    #[serde(default)]
    pub has_next_page: Option<bool>,
}

/// Failure body of `GET /api/search`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl From<SearchResponseBody> for SearchResponsePage {
    fn from(body: SearchResponseBody) -> Self {
        Self {
            results: body.results,
            total_results: body.total_results,
            has_next_page: body.pagination.and_then(|p| p.has_next_page),
            fallback: body.fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(date: Option<&str>, score: Option<f64>) -> SearchResultItem {
        SearchResultItem {
            id: ResultId::Number(1),
            title: "Slieve League".to_string(),
            url: "/slieve-league".to_string(),
            kind: None,
            author: None,
            date: date.map(str::to_string),
            score,
            excerpt: None,
        }
    }

    #[test]
    fn test_query_rejects_empty_term() {
        assert_eq!(SearchQuery::new("", 10, 0), Err(SearchError::EmptyTerm));
        assert_eq!(SearchQuery::new("   ", 10, 0).unwrap().term(), "   ");
    }

    #[test]
    fn test_query_rejects_zero_limit() {
        assert!(matches!(
            SearchQuery::new("cliffs", 0, 0),
            Err(SearchError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_query_accessors() {
        let query = SearchQuery::new("cliffs", 10, 20).unwrap();
        assert_eq!(query.term(), "cliffs");
        assert_eq!(query.limit(), 10);
        assert_eq!(query.offset(), 20);
    }

    #[test]
    fn test_parse_response_body() {
        let json = r#"{
            "results": [
                {"id": 42, "title": "Cliffs of Moher", "url": "/moher", "type": "post",
                 "author": "Aoife", "date": "2024-05-01T09:30:00", "score": 0.87,
                 "excerpt": "<p>The <b>cliffs</b></p>"},
                {"id": "page-7", "title": "Achill", "url": "/achill"}
            ],
            "totalResults": 27,
            "pagination": {"hasNextPage": true},
            "fallback": false
        }"#;

        let body: SearchResponseBody = serde_json::from_str(json).unwrap();
        let page = SearchResponsePage::from(body);

        assert_eq!(page.results.len(), 2);
        assert_eq!(page.total_results, 27);
        assert_eq!(page.has_next_page, Some(true));
        assert!(!page.fallback);
        assert_eq!(page.results[0].id, ResultId::Number(42));
        assert_eq!(page.results[0].kind.as_deref(), Some("post"));
        assert_eq!(page.results[1].id, ResultId::Text("page-7".to_string()));
        assert!(page.results[1].excerpt.is_none());
    }

    #[test]
    fn test_missing_pagination_leaves_flag_unset() {
        let json = r#"{"results": [], "totalResults": 0}"#;
        let page = SearchResponsePage::from(serde_json::from_str::<SearchResponseBody>(json).unwrap());
        assert_eq!(page.has_next_page, None);
        assert!(!page.fallback);
    }

    #[test]
    fn test_missing_results_is_rejected() {
        let json = r#"{"totalResults": 3}"#;
        assert!(serde_json::from_str::<SearchResponseBody>(json).is_err());
    }

    #[test]
    fn test_published_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(item(Some("2024-05-01T09:30:00Z"), None).published_date(), Some(expected));
        assert_eq!(item(Some("2024-05-01T09:30:00+01:00"), None).published_date(), Some(expected));
        assert_eq!(item(Some("2024-05-01T09:30:00"), None).published_date(), Some(expected));
        assert_eq!(item(Some("2024-05-01"), None).published_date(), Some(expected));
        assert_eq!(item(Some("last tuesday"), None).published_date(), None);
        assert_eq!(item(None, None).published_date(), None);
    }

    #[test]
    fn test_relevance_percent() {
        assert_eq!(item(None, Some(0.874)).relevance_percent(), Some(87));
        assert_eq!(item(None, Some(1.0)).relevance_percent(), Some(100));
        assert_eq!(item(None, Some(0.0)).relevance_percent(), None);
        assert_eq!(item(None, None).relevance_percent(), None);
    }

    #[test]
    fn test_result_id_display() {
        assert_eq!(ResultId::Number(12).to_string(), "12");
        assert_eq!(ResultId::Text("abc".to_string()).to_string(), "abc");
    }
}
