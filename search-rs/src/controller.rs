//! Search session controller
//!
//! The controller owns the session and is the only writer. It performs no
//! I/O: operations that need the network hand back a [`FetchTicket`], and the
//! caller feeds the outcome back through [`SearchController::complete`].
//!
//! Every ticket carries the generation that was current when it was issued.
//! Changing (or re-issuing) the term bumps the generation, so a response that
//! resolves after the term moved on is dropped instead of being applied to
//! the new term's session.

use tracing::{debug, info, warn};

use crate::error::{Result, SearchError};
use crate::session::{SearchSession, SearchStatus};
use crate::types::{SearchQuery, SearchResponsePage, DEFAULT_PAGE_SIZE};

/// Which step of the session a fetch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First page for a term (offset 0)
    Initial,
    /// Subsequent page requested by `load_more`
    More,
}

/// A request the caller must perform on the controller's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    kind: FetchKind,
    query: SearchQuery,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kind(&self) -> FetchKind {
        self.kind
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }
}

/// Outcome of feeding a fetch result back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Result applied; session is now in this status
    Applied(SearchStatus),
    /// Result belonged to an older generation and was ignored
    Stale,
}

/// Session state machine with a generation guard
#[derive(Debug)]
pub struct SearchController {
    session: SearchSession,
    page_size: usize,
    generation: u64,
}

impl SearchController {
    /// Controller with the default page size
    pub fn new() -> Self {
        Self {
            session: SearchSession::idle(),
            page_size: DEFAULT_PAGE_SIZE,
            generation: 0,
        }
    }

    /// Controller with a custom page size (must be non-zero)
    pub fn with_page_size(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(SearchError::InvalidQuery("page size must be greater than 0".to_string()));
        }
        Ok(Self {
            page_size,
            ..Self::new()
        })
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Activate a term. Always starts a new session, even for the same term.
    ///
    /// Returns `None` for an empty term: the session goes idle and nothing
    /// needs fetching.
    pub fn set_term(&mut self, term: &str) -> Option<FetchTicket> {
        if self.session.status().is_fetching() {
            debug!(
                "Superseding in-flight fetch for \"{}\" (generation {})",
                self.session.term(),
                self.generation
            );
        }
        self.generation += 1;

        let query = match SearchQuery::new(term, self.page_size, 0) {
            Ok(query) => query,
            Err(e) => {
                debug!("{}, session idle (generation {})", e, self.generation);
                self.session = SearchSession::idle();
                return None;
            }
        };

        info!("Starting search for \"{}\" (generation {})", term, self.generation);
        self.session = SearchSession::loading(term.to_string());

        Some(FetchTicket {
            generation: self.generation,
            kind: FetchKind::Initial,
            query,
        })
    }

    /// Request the next page. No-op unless results are loaded and more exist.
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        if self.session.status() != SearchStatus::Loaded || !self.session.has_next_page() {
            debug!(
                "load_more ignored (status {:?}, has_next_page {})",
                self.session.status(),
                self.session.has_next_page()
            );
            return None;
        }

        let offset = self.session.store().len();
        let query = SearchQuery::new(self.session.term(), self.page_size, offset).ok()?;

        debug!("Loading more for \"{}\" at offset {}", self.session.term(), offset);
        self.session.set_status(SearchStatus::LoadingMore);

        Some(FetchTicket {
            generation: self.generation,
            kind: FetchKind::More,
            query,
        })
    }

    /// Apply the outcome of a fetch
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<SearchResponsePage>,
    ) -> Completion {
        if ticket.generation != self.generation {
            warn!(
                "Discarding stale response for \"{}\" (generation {}, current {})",
                ticket.query.term(),
                ticket.generation,
                self.generation
            );
            return Completion::Stale;
        }

        let expected = match ticket.kind {
            FetchKind::Initial => SearchStatus::Loading,
            FetchKind::More => SearchStatus::LoadingMore,
        };
        if self.session.status() != expected {
            warn!(
                "Discarding unexpected {:?} response while {:?}",
                ticket.kind,
                self.session.status()
            );
            return Completion::Stale;
        }

        match result {
            Ok(page) => {
                let fallback = page.fallback;
                match ticket.kind {
                    FetchKind::Initial => self.session.store_mut().replace(page),
                    FetchKind::More => self.session.store_mut().append(page),
                }
                self.session.set_status(SearchStatus::Loaded);

                if fallback {
                    info!("Backend answered \"{}\" in fallback mode", self.session.term());
                }
                info!(
                    "Loaded {} of {} results for \"{}\"",
                    self.session.results().len(),
                    self.session.total_results(),
                    self.session.term()
                );
            }
            Err(e) => {
                warn!(
                    "Search for \"{}\" failed at offset {}: {}",
                    ticket.query.term(),
                    ticket.query.offset(),
                    e
                );
                self.session.fail(e.user_message());
            }
        }

        Completion::Applied(self.session.status())
    }
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new()
    }
}
