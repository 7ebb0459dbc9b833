//! Downloaded artifact model.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use sha2::{Digest, Sha256};

/// Body of `GET /rest/binary/<uid>`
#[derive(Debug, Clone, Deserialize)]
pub struct BinaryResponse {
    /// Base64 encoded file content
    pub binary: String,

    /// Name of the file as unpacked by the service
    #[serde(default)]
    pub file_name: Option<String>,

    /// Hex SHA-256 of the content
    #[serde(default, rename = "SHA256")]
    pub sha256: Option<String>,
}

/// One artifact fetched from the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub uid: String,
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub sha256: Option<String>,
}

impl Artifact {
    pub fn new(uid: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            uid: uid.into(),
            bytes,
            file_name: None,
            sha256: None,
        }
    }

    /// Set the announced digest
    pub fn sha256(mut self, digest: impl Into<String>) -> Self {
        self.sha256 = Some(digest.into());
        self
    }

    /// Decode a binary response
    pub fn decode(uid: &str, response: BinaryResponse) -> Result<Self, base64::DecodeError> {
        let bytes = STANDARD.decode(response.binary.trim())?;
        Ok(Self {
            uid: uid.to_string(),
            bytes,
            file_name: response.file_name,
            sha256: response.sha256,
        })
    }

    /// Check the content against the announced digest.
    ///
    /// Artifacts without a digest always pass.
    pub fn verify(&self) -> bool {
        match &self.sha256 {
            Some(expected) => sha256_hex(&self.bytes).eq_ignore_ascii_case(expected.trim()),
            None => true,
        }
    }
}

/// Lowercase hex SHA-256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
