// Typed failures for the two places where callers need to tell errors apart.
//
// Provider failures are per-request and recoverable: acquisition records them
// against the (year, month) unit and keeps going. Corpus store failures are
// fatal to the load or write that hit them.

use std::path::PathBuf;

/// A single provider request that did not produce a usable response.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}")]
    Status { status: u16 },

    #[error("could not decode provider response: {message}")]
    Parse { message: String },
}

impl FetchError {
    /// Whether a retry has a reasonable chance of succeeding.
    ///
    /// Network errors, timeouts, 429 and 5xx responses are transient. A feed
    /// we could not decode will decode the same way next time.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::Status { status } => *status == 429 || *status >= 500,
            FetchError::Parse { .. } => false,
        }
    }
}

/// Errors reading or writing a corpus file.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("corpus I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record on line {line} of {}: {source}", path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}
