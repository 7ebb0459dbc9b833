//! In-memory service for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{Artifact, Query, SearchMode};
use crate::service::{FactService, ServiceError};

/// A service that answers from predefined data.
///
/// Searches return the configured identifiers (or the configured error);
/// downloads succeed for registered artifacts and fail with HTTP 404 for
/// everything else. Every call is recorded.
#[derive(Debug, Default)]
pub struct MockService {
    uids: Vec<String>,
    search_error: Mutex<Option<ServiceError>>,
    artifacts: HashMap<String, Artifact>,
    searches: Mutex<Vec<SearchMode>>,
    fetches: Mutex<Vec<String>>,
}

impl MockService {
    /// Create a mock that finds `uids`
    pub fn new<I, S>(uids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            uids: uids.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Make the next search fail with `error`
    pub fn fail_search(self, error: ServiceError) -> Self {
        *self.search_error.lock().unwrap() = Some(error);
        self
    }

    /// Register an artifact that downloads successfully
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.insert(artifact.uid.clone(), artifact);
        self
    }

    /// Register `uid` with a small generated payload
    pub fn with_content(self, uid: &str) -> Self {
        let bytes = format!("content of {}", uid).into_bytes();
        self.with_artifact(Artifact::new(uid, bytes))
    }

    /// Search modes seen so far
    pub fn searches(&self) -> Vec<SearchMode> {
        self.searches.lock().unwrap().clone()
    }

    /// Identifiers fetched so far, in call order
    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl FactService for MockService {
    fn host(&self) -> &str {
        "mock://fact"
    }

    async fn search(&self, _query: &Query, mode: SearchMode) -> Result<Vec<String>, ServiceError> {
        self.searches.lock().unwrap().push(mode);
        match self.search_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(self.uids.clone()),
        }
    }

    async fn fetch_binary(&self, uid: &str) -> Result<Artifact, ServiceError> {
        self.fetches.lock().unwrap().push(uid.to_string());
        self.artifacts
            .get(uid)
            .cloned()
            .ok_or_else(|| ServiceError::Http {
                status: 404,
                body: format!("No file object with UID {} found", uid),
            })
    }
}
