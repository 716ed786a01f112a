pub mod oracle_api;
pub mod types;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use types::{Envelope, League, Match};

/// Status value the backend uses for a successful envelope.
pub const SUCCESS_STATUS: &str = "success";

#[derive(Debug, Error)]
pub enum FetchError {
    /// Request rejected, timed out, or answered with an HTTP error status.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Body was not the expected envelope.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    /// Envelope parsed but `status` was not "success".
    #[error("backend returned status {status:?}: {}", .message.as_deref().unwrap_or("no message"))]
    Application {
        status: String,
        message: Option<String>,
    },
}

impl FetchError {
    /// Text shown in place of the match list.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Application { .. } => "Failed to load matches data",
            FetchError::Transport(_) | FetchError::Decode(_) => {
                "Failed to load matches. Please try again later."
            }
        }
    }
}

#[async_trait]
pub trait MatchFeed: Send + Sync {
    /// Today's matches, each with prediction and odds comparison attached.
    async fn fetch_matches(&mut self) -> Result<Vec<Match>, FetchError>;
    async fn fetch_leagues(&mut self) -> Result<Vec<League>, FetchError>;
}

/// Unwrap a `{status, data}` envelope. Anything but a success status carrying
/// `data` is an error; there is no partial success.
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    if envelope.status != SUCCESS_STATUS {
        return Err(FetchError::Application {
            status: envelope.status,
            message: envelope.message,
        });
    }
    envelope.data.ok_or_else(|| {
        FetchError::Decode(serde::de::Error::custom("success envelope without data"))
    })
}
