//! Presentation view model
//!
//! Turns a session into the strings and flags a search page renders:
//! headings, the result summary, the fallback notice, per-result metadata
//! and the load-more button.

use serde::Serialize;
use std::fmt::Write;

use crate::session::{SearchSession, SearchStatus};
use crate::types::SearchResultItem;

pub const IDLE_MESSAGE: &str = "Please enter a search term.";
pub const ERROR_MESSAGE: &str = "There was an error performing your search. Please try again.";
pub const FALLBACK_NOTICE: &str =
    "Note: Using fallback search. For enhanced results, configure WP Engine Smart Search.";
pub const SEARCH_TIPS: [&str; 3] = [
    "Check your spelling",
    "Try different keywords",
    "Use more general terms",
];

/// Everything needed to render one state of the search page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchView {
    pub heading: String,
    pub message: String,
    pub error_detail: Option<String>,
    pub show_spinner: bool,
    pub fallback_notice: Option<String>,
    pub results: Vec<ResultView>,
    pub load_more: Option<LoadMoreButton>,
    pub search_tips: Vec<String>,
}

/// One rendered result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub title: String,
    pub url: String,
    /// Upper-cased content type
    pub badge: Option<String>,
    pub byline: Option<String>,
    pub date: Option<String>,
    pub relevance: Option<String>,
    /// Raw HTML excerpt
    pub excerpt_html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadMoreButton {
    pub label: String,
    pub enabled: bool,
}

impl From<&SearchResultItem> for ResultView {
    fn from(item: &SearchResultItem) -> Self {
        Self {
            title: item.title.clone(),
            url: item.url.clone(),
            badge: item.kind.as_ref().filter(|k| !k.is_empty()).map(|k| k.to_uppercase()),
            byline: item.author.as_ref().filter(|a| !a.is_empty()).map(|a| format!("By {}", a)),
            date: item.published_date().map(|d| d.format("%-d %B %Y").to_string()),
            relevance: item.relevance_percent().map(|p| format!("Relevance: {}%", p)),
            excerpt_html: item.excerpt.clone().filter(|e| !e.is_empty()),
        }
    }
}

/// Result count summary, e.g. `Found 27 results for "cliffs"`
pub fn summary_message(total: usize, term: &str) -> String {
    match total {
        0 => format!("No results found for \"{}\"", term),
        1 => format!("Found 1 result for \"{}\"", term),
        n => format!("Found {} results for \"{}\"", n, term),
    }
}

impl SearchView {
    /// Build the view for the current session state
    pub fn from_session(session: &SearchSession) -> Self {
        let mut view = Self {
            heading: String::new(),
            message: String::new(),
            error_detail: None,
            show_spinner: false,
            fallback_notice: None,
            results: Vec::new(),
            load_more: None,
            search_tips: Vec::new(),
        };

        match session.status() {
            SearchStatus::Idle => {
                view.heading = "Search".to_string();
                view.message = IDLE_MESSAGE.to_string();
            }
            SearchStatus::Loading => {
                view.heading = "Searching...".to_string();
                view.message = format!("Searching for \"{}\"...", session.term());
                view.show_spinner = true;
            }
            SearchStatus::Error => {
                view.heading = "Search Error".to_string();
                view.message = ERROR_MESSAGE.to_string();
                view.error_detail = session.error_message().map(|m| format!("Error: {}", m));
                // pages loaded before the failure stay visible
                view.results = session.results().iter().map(ResultView::from).collect();
            }
            SearchStatus::Loaded | SearchStatus::LoadingMore => {
                let total = session.total_results();
                view.heading = "Search Results".to_string();
                view.message = summary_message(total, session.term());

                if session.fallback() {
                    view.fallback_notice = Some(FALLBACK_NOTICE.to_string());
                }

                if total > 0 {
                    view.results = session.results().iter().map(ResultView::from).collect();
                    if session.has_next_page() {
                        let loading = session.status() == SearchStatus::LoadingMore;
                        view.load_more = Some(LoadMoreButton {
                            label: if loading { "Loading..." } else { "Load More Results" }.to_string(),
                            enabled: !loading,
                        });
                    }
                } else {
                    view.search_tips = SEARCH_TIPS.iter().map(|t| t.to_string()).collect();
                }
            }
        }

        view
    }

    /// Plain-text rendering for terminals
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{}", self.heading);
        let _ = writeln!(out, "{}", "=".repeat(self.heading.chars().count()));
        let _ = writeln!(out, "{}", self.message);
        if let Some(detail) = &self.error_detail {
            let _ = writeln!(out, "{}", detail);
        }
        if let Some(notice) = &self.fallback_notice {
            let _ = writeln!(out, "\n{}", notice);
        }

        for (i, result) in self.results.iter().enumerate() {
            let _ = writeln!(out, "\n{}. {}", i + 1, result.title);
            let _ = writeln!(out, "   {}", result.url);

            let meta: Vec<&str> = [
                result.badge.as_deref(),
                result.byline.as_deref(),
                result.date.as_deref(),
                result.relevance.as_deref(),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !meta.is_empty() {
                let _ = writeln!(out, "   {}", meta.join(" | "));
            }
            if let Some(excerpt) = &result.excerpt_html {
                let _ = writeln!(out, "   {}", excerpt);
            }
        }

        if let Some(button) = &self.load_more {
            let _ = writeln!(out, "\n[{}]", button.label);
        }

        if !self.search_tips.is_empty() {
            let _ = writeln!(out, "\nSearch Tips:");
            for tip in &self.search_tips {
                let _ = writeln!(out, "  - {}", tip);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SearchController;
    use crate::error::SearchError;
    use crate::types::{ResultId, SearchResponsePage};

    fn item(i: i64) -> SearchResultItem {
        SearchResultItem {
            id: ResultId::Number(i),
            title: format!("Cliff walk {}", i),
            url: format!("/cliff-walk-{}", i),
            kind: Some("post".to_string()),
            author: Some("Siobhán".to_string()),
            date: Some("2024-05-01T09:30:00".to_string()),
            score: Some(0.92),
            excerpt: Some("<p>Sheer <em>cliffs</em></p>".to_string()),
        }
    }

    fn loaded(term: &str, count: i64, total: usize, has_next: Option<bool>, fallback: bool) -> SearchController {
        let mut controller = SearchController::new();
        let ticket = controller.set_term(term).unwrap();
        controller.complete(
            &ticket,
            Ok(SearchResponsePage {
                results: (0..count).map(item).collect(),
                total_results: total,
                has_next_page: has_next,
                fallback,
            }),
        );
        controller
    }

    #[test]
    fn test_idle_view() {
        let view = SearchView::from_session(&SearchSession::idle());
        assert_eq!(view.heading, "Search");
        assert_eq!(view.message, "Please enter a search term.");
        assert!(view.results.is_empty());
        assert!(view.load_more.is_none());
    }

    #[test]
    fn test_loading_view() {
        let mut controller = SearchController::new();
        controller.set_term("cliffs");
        let view = SearchView::from_session(controller.session());

        assert_eq!(view.heading, "Searching...");
        assert_eq!(view.message, "Searching for \"cliffs\"...");
        assert!(view.show_spinner);
    }

    #[test]
    fn test_loaded_view() {
        let controller = loaded("cliffs", 10, 27, Some(true), false);
        let view = SearchView::from_session(controller.session());

        assert_eq!(view.heading, "Search Results");
        assert_eq!(view.message, "Found 27 results for \"cliffs\"");
        assert_eq!(view.results.len(), 10);
        assert!(view.fallback_notice.is_none());
        assert_eq!(
            view.load_more,
            Some(LoadMoreButton {
                label: "Load More Results".to_string(),
                enabled: true,
            })
        );

        let first = &view.results[0];
        assert_eq!(first.badge.as_deref(), Some("POST"));
        assert_eq!(first.byline.as_deref(), Some("By Siobhán"));
        assert_eq!(first.date.as_deref(), Some("1 May 2024"));
        assert_eq!(first.relevance.as_deref(), Some("Relevance: 92%"));
        assert_eq!(first.excerpt_html.as_deref(), Some("<p>Sheer <em>cliffs</em></p>"));
    }

    #[test]
    fn test_loading_more_disables_button() {
        let mut controller = loaded("cliffs", 10, 27, Some(true), false);
        controller.load_more().unwrap();
        let view = SearchView::from_session(controller.session());

        assert_eq!(view.results.len(), 10);
        assert_eq!(
            view.load_more,
            Some(LoadMoreButton {
                label: "Loading...".to_string(),
                enabled: false,
            })
        );
    }

    #[test]
    fn test_exhausted_hides_button() {
        let controller = loaded("moher", 1, 1, Some(false), false);
        let view = SearchView::from_session(controller.session());
        assert_eq!(view.message, "Found 1 result for \"moher\"");
        assert!(view.load_more.is_none());
    }

    #[test]
    fn test_no_results_view() {
        let controller = loaded("zzzz", 0, 0, None, false);
        let view = SearchView::from_session(controller.session());

        assert_eq!(view.message, "No results found for \"zzzz\"");
        assert!(view.results.is_empty());
        assert!(view.load_more.is_none());
        assert_eq!(view.search_tips.len(), 3);
    }

    #[test]
    fn test_fallback_notice() {
        let controller = loaded("cliffs", 2, 2, Some(false), true);
        let view = SearchView::from_session(controller.session());
        assert_eq!(view.fallback_notice.as_deref(), Some(FALLBACK_NOTICE));
    }

    #[test]
    fn test_error_view_keeps_results() {
        let mut controller = loaded("cliffs", 10, 27, Some(true), false);
        let ticket = controller.load_more().unwrap();
        controller.complete(&ticket, Err(SearchError::NetworkFailure("connection reset".to_string())));
        let view = SearchView::from_session(controller.session());

        assert_eq!(view.heading, "Search Error");
        assert_eq!(view.message, ERROR_MESSAGE);
        assert_eq!(view.error_detail.as_deref(), Some("Error: Network error: connection reset"));
        assert_eq!(view.results.len(), 10);
        assert!(view.load_more.is_none());
    }

    #[test]
    fn test_render_text() {
        let controller = loaded("cliffs", 1, 3, Some(true), true);
        let text = SearchView::from_session(controller.session()).render_text();

        assert!(text.starts_with("Search Results\n==============\n"));
        assert!(text.contains("Found 3 results for \"cliffs\""));
        assert!(text.contains(FALLBACK_NOTICE));
        assert!(text.contains("1. Cliff walk 0"));
        assert!(text.contains("POST | By Siobhán | 1 May 2024 | Relevance: 92%"));
        assert!(text.contains("[Load More Results]"));
    }
}
