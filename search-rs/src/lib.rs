//! search-rs: incremental site search client
//!
//! Queries a paginated search backend, accumulates results across
//! "load more" requests and exposes session state for rendering.
//!
//! # Features
//!
//! - Paginated `GET /api/search` client
//! - Result accumulation without deduplication
//! - Session state machine (idle, loading, loaded, loading more, error)
//! - Stale response guard when the term changes mid-flight
//! - Fallback backend notice
//!
//! # Example Configuration
//!
//! ```toml
//! [backend]
//! base_url = "https://wildatlanticway.example"
//! endpoint = "/api/search"
//!
//! [session]
//! page_size = 10
//!
//! [logging]
//! level = "info"
//! ```

pub mod client;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod session;
pub mod store;
pub mod types;
pub mod view;

pub use client::{SearchApiClient, SearchBackend};
pub use config::SearchConfig;
pub use controller::{Completion, FetchKind, FetchTicket, SearchController};
pub use driver::SearchDriver;
pub use error::{Result, SearchError};
pub use session::{SearchSession, SearchStatus};
pub use store::ResultStore;
pub use types::{ResultId, SearchQuery, SearchResponsePage, SearchResultItem};
pub use view::SearchView;
