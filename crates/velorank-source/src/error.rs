use thiserror::Error;

/// Failures raised while locating or fetching sheet data.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// The configured sharing link is not a recognized spreadsheet URL.
    #[error("unrecognized spreadsheet URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// A tab fetch exceeded its bounded wait.
    #[error("request for tab '{tab}' timed out")]
    Timeout { tab: String },

    /// Network or HTTP-level failure for one tab.
    #[error("transport failure for tab '{tab}': {reason}")]
    Transport { tab: String, reason: String },

    /// Every tab fetch in a batch failed.
    #[error("no tab data could be fetched")]
    NoData,
}
