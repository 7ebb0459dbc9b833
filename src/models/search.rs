//! Search mode and search response models.

use serde::Deserialize;

/// Which FACT search resource a run queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Files matching the query
    #[default]
    File,
    /// Firmware containing files that match the query
    Firmware,
}

impl SearchMode {
    /// Select the mode from the `--firmware` switch
    pub fn from_firmware_flag(firmware: bool) -> Self {
        if firmware {
            SearchMode::Firmware
        } else {
            SearchMode::File
        }
    }

    /// REST resource path, relative to the host
    pub fn resource(&self) -> &'static str {
        match self {
            SearchMode::File => "rest/file_object",
            SearchMode::Firmware => "rest/firmware",
        }
    }

    /// Extra query-string parameters the resource needs
    pub fn extra_params(&self) -> &'static str {
        match self {
            SearchMode::File => "",
            SearchMode::Firmware => "&recursive=true",
        }
    }
}

/// Response of one search call.
///
/// Every field is optional on the wire; [`SearchResult::into_uids`] decides
/// what a missing field means.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResult {
    /// Matching identifiers, in service order
    #[serde(default)]
    pub uids: Option<Vec<String>>,

    /// Set by the service when it refuses the query
    #[serde(default)]
    pub error_message: Option<String>,

    /// Service status code (0 on success)
    #[serde(default)]
    pub status: Option<i64>,
}

/// Outcome of interpreting a [`SearchResult`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was accepted
    Accepted(Vec<String>),
    /// The service rejected the query with this message
    Rejected(String),
    /// The payload has neither identifiers nor an error message
    Malformed,
}

impl SearchResult {
    /// Interpret the payload
    pub fn into_uids(self) -> SearchOutcome {
        if let Some(message) = self.error_message {
            return SearchOutcome::Rejected(message);
        }
        match self.uids {
            Some(uids) => SearchOutcome::Accepted(uids),
            None => SearchOutcome::Malformed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_resources() {
        assert_eq!(SearchMode::from_firmware_flag(false), SearchMode::File);
        assert_eq!(SearchMode::from_firmware_flag(true), SearchMode::Firmware);
        assert_eq!(SearchMode::File.resource(), "rest/file_object");
        assert_eq!(SearchMode::Firmware.resource(), "rest/firmware");
        assert_eq!(SearchMode::Firmware.extra_params(), "&recursive=true");
    }

    #[test]
    fn test_accepted_result() {
        let result: SearchResult = serde_json::from_str(
            r#"{"uids": ["a", "b"], "status": 0, "request": {"query": "{}"}}"#,
        )
        .unwrap();
        assert_eq!(
            result.into_uids(),
            SearchOutcome::Accepted(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_rejected_result() {
        let result: SearchResult =
            serde_json::from_str(r#"{"error_message": "Query must be a json document", "status": 1}"#)
                .unwrap();
        assert_eq!(
            result.into_uids(),
            SearchOutcome::Rejected("Query must be a json document".to_string())
        );
    }

    #[test]
    fn test_missing_uids() {
        let result: SearchResult = serde_json::from_str(r#"{"status": 0}"#).unwrap();
        assert_eq!(result.into_uids(), SearchOutcome::Malformed);
    }
}
