//! Utility modules supporting search and download.
//!
//! - [`HttpClient`]: shared reqwest client with user agent and timeouts
//! - [`prepare_storage_dir`]: create the destination directory
//! - [`file_name_for_uid`]: map an identifier to a safe file name
//! - [`write_atomically`]: write a file without leaving partial output behind
//! - [`ProgressCounter`]: decide when a progress checkpoint is due

mod http;
mod progress;
mod storage;

pub use http::{HttpClient, CONNECT_TIMEOUT, DEFAULT_USER_AGENT};
pub use progress::{ProgressCounter, REPORT_INTERVAL};
pub use storage::{artifact_path, file_name_for_uid, prepare_storage_dir, write_atomically};
