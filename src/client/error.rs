//! Client-side error type

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with an error envelope
    #[error("{code} ({http_status}): {message}")]
    Procedure { code: String, http_status: u16, message: String },

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Error code string when the backend reported one
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Procedure { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == Some("NOT_FOUND")
    }

    pub fn is_bad_request(&self) -> bool {
        self.code() == Some("BAD_REQUEST")
    }
}
