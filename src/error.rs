use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can stop a translation job.
#[derive(Error, Debug)]
pub enum TranslatorError {
    /// Missing or invalid command-line input
    #[error("{0}")]
    Usage(String),

    #[error("network error while {context}: {source}")]
    Network {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("book source answered with status {0}")]
    BookUnavailable(StatusCode),

    #[error("downloaded book is empty")]
    EmptyBook,

    #[error("book has no text left after removing the Project Gutenberg header and footer")]
    NoBookContent,

    #[error("SEA-LION rejected the API key ({status}): {detail}")]
    Authentication { status: StatusCode, detail: String },

    #[error("SEA-LION request failed ({status}): {detail}")]
    Service { status: StatusCode, detail: String },

    #[error("unexpected SEA-LION response: {0}")]
    MalformedResponse(String),

    #[error("failed to write translation: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to start mock server: {0}")]
    MockServer(#[from] warp::Error),
}

impl TranslatorError {
    pub fn network(context: &'static str, source: reqwest::Error) -> Self {
        Self::Network { context, source }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Process exit code for this error. 2 matches clap's own parse failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::Network { .. } | Self::BookUnavailable(_) => 3,
            Self::Authentication { .. } | Self::Service { .. } | Self::MalformedResponse(_) => 4,
            Self::EmptyBook | Self::NoBookContent => 5,
            Self::Io(_) | Self::MockServer(_) => 6,
        }
    }
}
