//! Error types for the Sleeper Fantasy Football service

use serde::Serialize;
use thiserror::Error;


pub type Result<T> = std::result::Result<T, SleeperError>;

#[derive(Error, Debug)]
pub enum SleeperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sleeper API returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Sleeper API returned no data for {what}")]
    NoData { what: String },

    #[error("{message}")]
    NotConfigured { message: String },

    #[error(
        "{var} still holds a placeholder value; set it to your real Sleeper username or league id"
    )]
    PlaceholderConfig { var: String },

    #[error("Could not find a roster for {username} in league {league_id}")]
    RosterNotFound { league_id: String, username: String },

    #[error("Failed to parse id: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("Invalid position: {position}")]
    InvalidPosition { position: String },
}

/// Coarse classification used by the output layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    NotFound,
    Upstream,
    InvalidInput,
}

impl SleeperError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SleeperError::NotConfigured { .. } | SleeperError::PlaceholderConfig { .. } => {
                ErrorKind::Configuration
            }
            SleeperError::RosterNotFound { .. } => ErrorKind::NotFound,
            SleeperError::Http(_)
            | SleeperError::Json(_)
            | SleeperError::Status { .. }
            | SleeperError::NoData { .. } => ErrorKind::Upstream,
            SleeperError::InvalidId(_) | SleeperError::InvalidPosition { .. } => {
                ErrorKind::InvalidInput
            }
        }
    }

    pub(crate) fn no_accounts() -> Self {
        SleeperError::NotConfigured {
            message: "No Sleeper account configured. Set SLEEPER_USERNAME_A and \
                      SLEEPER_LEAGUE_ID_A (or SLEEPER_USERNAME and SLEEPER_LEAGUE_ID)"
                .to_string(),
        }
    }
}
