//! Async search driver
//!
//! Runs fetches for a [`SearchController`] on tokio tasks. Results come back
//! over a channel and are applied by the driver's owner, so the session is
//! only ever mutated from one place and only when a fetch resolves. In-flight
//! fetches are never aborted; the controller's generation check drops the
//! ones that no longer matter.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::client::SearchBackend;
use crate::config::SessionConfig;
use crate::controller::{Completion, FetchTicket, SearchController};
use crate::error::{Result, SearchError};
use crate::session::SearchSession;
use crate::types::SearchResponsePage;

type FetchOutcome = (FetchTicket, Result<SearchResponsePage>);

/// Drives one search context against a backend
pub struct SearchDriver {
    controller: SearchController,
    backend: Arc<dyn SearchBackend>,
    fetch_timeout: Option<Duration>,
    tx: mpsc::UnboundedSender<FetchOutcome>,
    rx: mpsc::UnboundedReceiver<FetchOutcome>,
    in_flight: usize,
}

impl SearchDriver {
    /// Create a driver around an existing controller
    pub fn new(backend: Arc<dyn SearchBackend>, controller: SearchController) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            controller,
            backend,
            fetch_timeout: None,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Create a driver using the `[session]` configuration section
    pub fn from_config(backend: Arc<dyn SearchBackend>, config: &SessionConfig) -> Result<Self> {
        let controller = SearchController::with_page_size(config.page_size)?;
        Ok(Self::new(backend, controller).with_fetch_timeout(config.fetch_timeout()))
    }

    /// Fail fetches that take longer than `timeout`
    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn session(&self) -> &SearchSession {
        self.controller.session()
    }

    /// Number of spawned fetches whose results have not been applied yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Activate a term; returns whether a request was issued
    pub fn set_term(&mut self, term: &str) -> bool {
        match self.controller.set_term(term) {
            Some(ticket) => {
                self.spawn_fetch(ticket);
                true
            }
            None => false,
        }
    }

    /// Request the next page; returns whether a request was issued
    pub fn load_more(&mut self) -> bool {
        match self.controller.load_more() {
            Some(ticket) => {
                self.spawn_fetch(ticket);
                true
            }
            None => false,
        }
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let timeout = self.fetch_timeout;
        self.in_flight += 1;

        debug!(
            "Spawning fetch for \"{}\" offset {} (generation {})",
            ticket.query().term(),
            ticket.query().offset(),
            ticket.generation()
        );

        tokio::spawn(async move {
            let fetch = backend.fetch_page(ticket.query());
            let result = match timeout {
                Some(limit) => match tokio::time::timeout(limit, fetch).await {
                    Ok(result) => result,
                    Err(_) => Err(SearchError::NetworkFailure(format!(
                        "request timed out after {:?}",
                        limit
                    ))),
                },
                None => fetch.await,
            };
            // receiver is gone only if the driver was dropped
            let _ = tx.send((ticket, result));
        });
    }

    /// Wait for the next fetch to resolve and apply it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }

        let (ticket, result) = self.rx.recv().await?;
        self.in_flight -= 1;
        Some(self.controller.complete(&ticket, result))
    }

    /// Apply every outstanding fetch, stale ones included
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    /// Activate a term and wait for its first page
    pub async fn search(&mut self, term: &str) -> &SearchSession {
        self.set_term(term);
        self.settle().await;
        self.session()
    }

    /// Request the next page and wait for it; returns whether one was requested
    pub async fn load_next_page(&mut self) -> bool {
        if !self.load_more() {
            return false;
        }
        self.settle().await;
        true
    }
}
