//! Search query model and validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// A validated FACT search query.
///
/// The client treats the query as opaque JSON: the only guarantee is that it
/// parsed. The service decides what the filter means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(Value);

impl Query {
    /// Wrap an already parsed JSON value
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parse a query from a JSON string
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        serde_json::from_str(raw)
            .map(Self)
            .map_err(QueryError::InvalidJson)
    }

    /// Read and parse a query from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, QueryError> {
        let content = std::fs::read_to_string(path).map_err(|source| QueryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// The parsed JSON value
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Compact JSON encoding, as sent to the service. Object keys keep the
    /// order they were written in.
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build the query for a run from the two possible inputs.
///
/// A query file takes precedence over an inline query when both are given;
/// the two are never merged.
pub fn build_query(query: Option<&str>, query_file: Option<&Path>) -> Result<Query, QueryError> {
    match (query_file, query) {
        (Some(path), _) => Query::from_file(path),
        (None, Some(raw)) => Query::parse(raw),
        (None, None) => Err(QueryError::Missing),
    }
}

/// Errors that can occur while building a query
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Neither an inline query nor a query file was supplied
    #[error("no query supplied")]
    Missing,

    /// The query file could not be read
    #[error("cannot read query file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The query is not valid JSON
    #[error("{0}")]
    InvalidJson(#[source] serde_json::Error),
}
