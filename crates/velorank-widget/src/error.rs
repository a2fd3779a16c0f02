use thiserror::Error;

use velorank_source::SourceError;

/// Everything that can go wrong during a refresh cycle. The orchestrator is
/// the only place these are turned into user-visible behavior.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Fetches succeeded but extraction produced nothing usable.
    #[error("no usable standings data")]
    NoData,

    /// Fetched payloads could not be mapped to the expected shape.
    #[error("standings sheet structure was not recognized")]
    InvalidStructure,

    /// The presentation layer failed while building output.
    #[error("failed to render standings: {0}")]
    Render(String),

    /// No display target was bound before `initialize()`.
    #[error("display target is missing")]
    MissingTarget,
}

impl WidgetError {
    /// Short plain-language message shown to the user. Never leaks raw
    /// error text.
    pub fn user_message(&self) -> &'static str {
        match self {
            WidgetError::Source(SourceError::Timeout { .. }) => {
                "The standings are taking too long to load. Please try again."
            }
            WidgetError::Source(SourceError::NoData) | WidgetError::NoData => {
                "No standings are available right now. Please try again later."
            }
            WidgetError::Source(_) => {
                "We couldn't reach the standings sheet. Check your connection and try again."
            }
            WidgetError::InvalidStructure => {
                "The standings sheet doesn't look as expected. Please try again later."
            }
            WidgetError::Render(_) => "Something went wrong displaying the standings.",
            WidgetError::MissingTarget => "The standings widget is not set up correctly.",
        }
    }
}
