//! Access to a FACT service.
//!
//! [`FactService`] is the seam between the download loop and the network.
//! [`RestService`] talks to a real FACT instance over its REST API;
//! [`MockService`] answers from memory for tests.

mod mock;
mod rest;

pub use mock::MockService;
pub use rest::RestService;

use crate::models::{Artifact, Query, SearchMode};
use async_trait::async_trait;

/// The operations the client needs from a FACT service
#[async_trait]
pub trait FactService: Send + Sync + std::fmt::Debug {
    /// Base URL of the service, for log messages
    fn host(&self) -> &str;

    /// Run a search and return the matching identifiers in service order
    async fn search(&self, query: &Query, mode: SearchMode) -> Result<Vec<String>, ServiceError>;

    /// Fetch one artifact by identifier
    async fn fetch_binary(&self, uid: &str) -> Result<Artifact, ServiceError>;
}

/// Errors that can occur when talking to the service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Connection refused, timeout or any other transport failure
    #[error("{0}")]
    Unreachable(String),

    /// The service answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The body is not the JSON we expect
    #[error("{0}")]
    InvalidResponse(String),

    /// The service refused the query
    #[error("{0}")]
    Rejected(String),

    /// The artifact payload could not be decoded
    #[error("cannot decode artifact: {0}")]
    Decode(String),

    /// The artifact does not match its announced digest
    #[error("checksum mismatch for {0}")]
    Integrity(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport failures and timeouts mean the host is unreachable; a body that
/// breaks off or cannot be decoded after a response arrived is invalid.
impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            ServiceError::Unreachable(err.to_string())
        } else if err.is_body() || err.is_decode() {
            ServiceError::InvalidResponse(err.to_string())
        } else {
            ServiceError::Unreachable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::InvalidResponse(err.to_string())
    }
}

impl From<base64::DecodeError> for ServiceError {
    fn from(err: base64::DecodeError) -> Self {
        ServiceError::Decode(err.to_string())
    }
}
