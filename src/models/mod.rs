//! Core data models for queries, search results and artifacts.

mod artifact;
mod query;
mod search;

pub use artifact::{sha256_hex, Artifact, BinaryResponse};
pub use query::{build_query, Query, QueryError};
pub use search::{SearchMode, SearchOutcome, SearchResult};
