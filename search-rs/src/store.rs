//! Accumulated results for the active term
//!
//! The store keeps pages in arrival order and never deduplicates: if the
//! backend repeats an item across pages, both copies are kept. Scalars
//! (`total_results`, pagination flag, `fallback`) always reflect the most
//! recent page.

use tracing::warn;

use crate::types::{SearchResponsePage, SearchResultItem};

/// Ordered result accumulator
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    results: Vec<SearchResultItem>,
    total_results: usize,
    server_has_next: Option<bool>,
    fallback: bool,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and take the page as the new contents
    pub fn replace(&mut self, page: SearchResponsePage) {
        self.results = page.results;
        self.total_results = page.total_results;
        self.server_has_next = page.has_next_page;
        self.fallback = page.fallback;
        self.check_totals();
    }

    /// Append a page, trusting its scalars over the previous ones
    pub fn append(&mut self, page: SearchResponsePage) {
        self.results.extend(page.results);
        self.total_results = page.total_results;
        self.server_has_next = page.has_next_page;
        self.fallback = page.fallback;
        self.check_totals();
    }

    /// Reset to the empty state
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn results(&self) -> &[SearchResultItem] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn total_results(&self) -> usize {
        self.total_results
    }

    pub fn fallback(&self) -> bool {
        self.fallback
    }

    /// Server flag when present, otherwise "fewer accumulated than total"
    pub fn has_next_page(&self) -> bool {
        self.server_has_next
            .unwrap_or(self.results.len() < self.total_results)
    }

    fn check_totals(&self) {
        if self.results.len() > self.total_results {
            warn!(
                "Backend reported {} total results but {} have been accumulated",
                self.total_results,
                self.results.len()
            );
        }
    }
}
