//! # FACT Search and Download
//!
//! Finds files (or firmware) matching a query on a FACT firmware analysis
//! service and downloads them into a local directory.
//!
//! ## Architecture
//!
//! - [`models`]: queries, search results and artifacts
//! - [`service`]: the [`FactService`] trait and its REST implementation
//! - [`app`]: the search-then-download run
//! - [`utils`]: HTTP client, storage and progress helpers
//! - [`config`]: configuration management

pub mod app;
pub mod config;
pub mod models;
pub mod service;
pub mod utils;

// Re-export commonly used types
pub use app::{run, AppError, RunSummary};
pub use models::{build_query, Query, SearchMode};
pub use service::{FactService, RestService};

/// Program name shown by `--version`
pub const PROGRAM_NAME: &str = "FACT Search and Download";

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
