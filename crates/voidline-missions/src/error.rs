use thiserror::Error;

use voidline_core::mission::MissionId;

#[derive(Error, Debug)]
pub enum MissionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Mission service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unknown mission: {0}")]
    UnknownMission(MissionId),

    #[error("Credit ledger rejected reward for mission {0}")]
    LedgerRejected(MissionId),
}

impl MissionError {
    /// Failures worth a second attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, MissionError::Network(_) | MissionError::Timeout(_))
    }
}

impl From<reqwest::Error> for MissionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MissionError::Timeout(err.to_string())
        } else if err.is_decode() {
            MissionError::Api {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                message: format!("undecodable response: {err}"),
            }
        } else {
            MissionError::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, MissionError>;
