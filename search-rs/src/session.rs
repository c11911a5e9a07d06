//! Search session state
//!
//! A session is the accumulated state for one active term. It is read by
//! anyone but written only by the controller.

use serde::Serialize;

use crate::store::ResultStore;
use crate::types::SearchResultItem;

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// No term set
    Idle,
    /// Initial fetch in flight
    Loading,
    /// Results available (possibly zero)
    Loaded,
    /// Subsequent page in flight, previous results still shown
    LoadingMore,
    /// Last fetch failed
    Error,
}

impl SearchStatus {
    /// A fetch for this session is outstanding
    pub fn is_fetching(&self) -> bool {
        matches!(self, SearchStatus::Loading | SearchStatus::LoadingMore)
    }
}

/// State associated with one active term
#[derive(Debug, Clone)]
pub struct SearchSession {
    term: String,
    store: ResultStore,
    status: SearchStatus,
    error_message: Option<String>,
}

impl SearchSession {
    /// Session with no term
    pub fn idle() -> Self {
        Self {
            term: String::new(),
            store: ResultStore::new(),
            status: SearchStatus::Idle,
            error_message: None,
        }
    }

    /// Fresh session for `term` with its first page in flight
    pub(crate) fn loading(term: String) -> Self {
        Self {
            term,
            store: ResultStore::new(),
            status: SearchStatus::Loading,
            error_message: None,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn results(&self) -> &[SearchResultItem] {
        self.store.results()
    }

    pub fn total_results(&self) -> usize {
        self.store.total_results()
    }

    pub fn has_next_page(&self) -> bool {
        self.store.has_next_page()
    }

    pub fn fallback(&self) -> bool {
        self.store.fallback()
    }

    pub(crate) fn store(&self) -> &ResultStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut ResultStore {
        &mut self.store
    }

    pub(crate) fn set_status(&mut self, status: SearchStatus) {
        self.status = status;
        if status != SearchStatus::Error {
            self.error_message = None;
        }
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.status = SearchStatus::Error;
        self.error_message = Some(message);
    }

    /// Serializable view including derived flags
    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            term: &self.term,
            status: self.status,
            results: self.store.results(),
            total_results: self.store.total_results(),
            has_next_page: self.store.has_next_page(),
            fallback: self.store.fallback(),
            error_message: self.error_message.as_deref(),
        }
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::idle()
    }
}

/// JSON shape of a session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot<'a> {
    pub term: &'a str,
    pub status: SearchStatus,
    pub results: &'a [SearchResultItem],
    pub total_results: usize,
    pub has_next_page: bool,
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<&'a str>,
}
