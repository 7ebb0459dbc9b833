//! Search-then-download run.
//!
//! A run prepares the destination, asks the service for matching
//! identifiers and downloads them one at a time. Only the search phase can
//! fail the run; a failed download is counted and skipped.

use std::path::{Path, PathBuf};

use crate::config::ConfigError;
use crate::models::{Query, QueryError, SearchMode};
use crate::service::{FactService, ServiceError};
use crate::utils::{artifact_path, prepare_storage_dir, write_atomically, ProgressCounter};

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Identifiers returned by the search
    pub found: usize,
    /// Artifacts written to disk
    pub downloaded: usize,
}

/// Conditions that end the process with a non-zero status
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Neither `-q` nor `-Q` was given
    #[error("No query given. Use -q or -Q option")]
    NoQuery,

    /// The query text is not valid JSON
    #[error("Invalid json: {0}")]
    InvalidQuery(String),

    /// The query file could not be read
    #[error("Cannot read query file {}: {source}", .path.display())]
    QueryFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transport failure or non-success status during the search
    #[error("FACT not reachable: {0}")]
    Unreachable(String),

    /// The search response could not be interpreted
    #[error("Server's response is invalid: {0}")]
    InvalidResponse(String),

    /// The service refused the query
    #[error("Query not accepted: {0}")]
    Rejected(String),

    /// The destination directory could not be created
    #[error("Cannot use destination {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Missing => AppError::NoQuery,
            QueryError::Io { path, source } => AppError::QueryFile { path, source },
            QueryError::InvalidJson(e) => AppError::InvalidQuery(e.to_string()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unreachable(_) | ServiceError::Http { .. } => {
                AppError::Unreachable(err.to_string())
            }
            ServiceError::Rejected(message) => AppError::Rejected(message),
            other => AppError::InvalidResponse(other.to_string()),
        }
    }
}

/// Find everything matching `query` and download it into `destination`
pub async fn run(
    service: &dyn FactService,
    query: &Query,
    mode: SearchMode,
    destination: &Path,
) -> Result<RunSummary, AppError> {
    let storage = prepare_storage_dir(destination).map_err(|source| AppError::Storage {
        path: destination.to_path_buf(),
        source,
    })?;

    tracing::debug!("searching {} ({:?} mode) for {}", service.host(), mode, query);
    let uids = service.search(query, mode).await?;
    let total = uids.len();

    tracing::info!("start download of {} files", total);
    let mut progress = ProgressCounter::new(total);
    for uid in &uids {
        let saved = download_artifact(service, uid, &storage).await;
        if let Some((count, total)) = progress.record(saved.is_some()) {
            tracing::info!("{} / {}", count, total);
        }
    }

    let summary = RunSummary {
        found: total,
        downloaded: progress.succeeded(),
    };
    tracing::info!(
        "Found {} file(s), downloaded {} file(s)",
        summary.found,
        summary.downloaded
    );
    Ok(summary)
}

/// Fetch one artifact and write it under `destination`.
///
/// Returns the written path, or `None` if the artifact could not be
/// downloaded for any reason.
pub async fn download_artifact(
    service: &dyn FactService,
    uid: &str,
    destination: &Path,
) -> Option<PathBuf> {
    match try_download(service, uid, destination).await {
        Ok(path) => {
            tracing::debug!("downloaded {} to {}", uid, path.display());
            Some(path)
        }
        Err(e) => {
            tracing::warn!("could not download {}: {}", uid, e);
            None
        }
    }
}

async fn try_download(
    service: &dyn FactService,
    uid: &str,
    destination: &Path,
) -> Result<PathBuf, ServiceError> {
    let path = artifact_path(destination, uid)
        .ok_or_else(|| ServiceError::InvalidResponse(format!("unusable uid {:?}", uid)))?;

    let artifact = service.fetch_binary(uid).await?;
    if !artifact.verify() {
        return Err(ServiceError::Integrity(uid.to_string()));
    }

    let target = path.clone();
    tokio::task::spawn_blocking(move || write_atomically(&target, &artifact.bytes))
        .await
        .map_err(std::io::Error::other)??;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Artifact;
    use crate::service::MockService;
    use serde_json::json;
    use tempfile::TempDir;

    fn query() -> Query {
        Query::new(json!({"vendor": "AVM"}))
    }

    #[tokio::test]
    async fn test_partial_failure_is_tallied() {
        let temp_dir = TempDir::new().unwrap();
        let service = MockService::new(["a", "b", "c"])
            .with_content("a")
            .with_content("c");

        let summary = run(&service, &query(), SearchMode::File, temp_dir.path())
            .await
            .unwrap();

        assert_eq!(summary, RunSummary { found: 3, downloaded: 2 });
        assert_eq!(service.fetches(), vec!["a", "b", "c"]);
        assert!(temp_dir.path().join("a").is_file());
        assert!(!temp_dir.path().join("b").exists());
        assert!(temp_dir.path().join("c").is_file());
    }

    #[tokio::test]
    async fn test_written_content() {
        let temp_dir = TempDir::new().unwrap();
        let service = MockService::new(["abc_5"])
            .with_artifact(Artifact::new("abc_5", b"hello".to_vec()));

        let path = download_artifact(&service, "abc_5", temp_dir.path())
            .await
            .unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_checksum_mismatch_is_not_downloaded() {
        let temp_dir = TempDir::new().unwrap();
        let service = MockService::new(["abc_5"])
            .with_artifact(Artifact::new("abc_5", b"hello".to_vec()).sha256("deadbeef"));

        assert!(download_artifact(&service, "abc_5", temp_dir.path())
            .await
            .is_none());
        assert!(!temp_dir.path().join("abc_5").exists());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("abc_5")).unwrap();
        let service = MockService::new(["abc_5"]).with_content("abc_5");

        assert!(download_artifact(&service, "abc_5", temp_dir.path())
            .await
            .is_none());

        let names: Vec<String> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["abc_5"]);
        assert!(temp_dir.path().join("abc_5").is_dir());
    }

    #[tokio::test]
    async fn test_search_failure_skips_downloads() {
        let temp_dir = TempDir::new().unwrap();
        let service = MockService::new(["a"])
            .with_content("a")
            .fail_search(ServiceError::Unreachable("connection refused".to_string()));

        let err = run(&service, &query(), SearchMode::File, temp_dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unreachable(_)));
        assert!(service.fetches().is_empty());
    }

    #[tokio::test]
    async fn test_firmware_mode_is_passed_through() {
        let temp_dir = TempDir::new().unwrap();
        let service = MockService::new(Vec::<String>::new());

        let summary = run(&service, &query(), SearchMode::Firmware, temp_dir.path())
            .await
            .unwrap();

        assert_eq!(summary, RunSummary { found: 0, downloaded: 0 });
        assert_eq!(service.searches(), vec![SearchMode::Firmware]);
    }

    #[tokio::test]
    async fn test_destination_is_created() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir.path().join("firmware").join("avm");
        let service = MockService::new(["a"]).with_content("a");

        run(&service, &query(), SearchMode::File, &destination)
            .await
            .unwrap();
        assert!(destination.join("a").is_file());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AppError::from(QueryError::Missing).to_string(),
            "No query given. Use -q or -Q option"
        );
        assert_eq!(
            AppError::from(ServiceError::Rejected("bad field".to_string())).to_string(),
            "Query not accepted: bad field"
        );
        assert!(matches!(
            AppError::from(ServiceError::Http {
                status: 502,
                body: String::new()
            }),
            AppError::Unreachable(_)
        ));
        assert!(matches!(
            AppError::from(ServiceError::InvalidResponse("eof".to_string())),
            AppError::InvalidResponse(_)
        ));
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(AppError::from(QueryError::InvalidJson(json_err))
            .to_string()
            .starts_with("Invalid json: "));
    }

    #[test]
    fn test_unreadable_query_file_is_not_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("query.json");

        let err = AppError::from(crate::models::build_query(None, Some(&missing)).unwrap_err());
        assert!(matches!(err, AppError::QueryFile { .. }));

        let message = err.to_string();
        assert!(message.starts_with("Cannot read query file "), "{message}");
        assert!(message.contains("query.json"));
        assert!(!message.contains("Invalid json"));
    }
}
