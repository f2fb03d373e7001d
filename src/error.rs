use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every way a rank lookup can fail. Each kind maps to one HTTP status.
#[derive(Error, Debug)]
pub enum RankError {
    /// The path parameter was empty or whitespace.
    #[error("Player ID is required")]
    InvalidRequest,
    #[error("Invalid player ID '{0}'. Use platform:username (e.g. epic:username, steam:76561198xxx)")]
    InvalidFormat(String),
    #[error("Invalid platform '{0}'. Use epic, steam, psn, xbl or switch")]
    InvalidPlatform(String),
    #[error("Player not found on Tracker.gg")]
    PlayerNotFound,
    /// Tracker.gg answered 401 or 403, usually its bot protection.
    #[error("Unauthorized access to the Tracker.gg API")]
    Unauthorized,
    #[error("Rate limit exceeded. Try again in a few minutes")]
    RateLimited,
    /// Any other non-200 status from Tracker.gg.
    #[error("Tracker.gg API error (status {status}): {body}")]
    UpstreamError { status: u16, body: String },
    /// Connect failure, timeout or unreadable body.
    #[error("Request to Tracker.gg failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to parse Tracker.gg JSON: {0}")]
    ParseError(#[from] serde_json::Error),
    /// The profile parsed but held no known competitive playlist.
    #[error("No competitive rank data found. The player may not have played ranked matches")]
    NoRankedData,
}

/// Body returned for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl RankError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RankError::InvalidRequest
            | RankError::InvalidFormat(_)
            | RankError::InvalidPlatform(_) => StatusCode::BAD_REQUEST,
            RankError::PlayerNotFound => StatusCode::NOT_FOUND,
            RankError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            RankError::InvalidRequest => "A player ID must be provided",
            _ => "Could not fetch the player's rank",
        }
    }
}

impl IntoResponse for RankError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            message: self.message().to_string(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
