use thiserror::Error;

/// Failures inside the store API client.
///
/// These never cross the client's public boundary: every variant is logged
/// and collapsed into a failed [`crate::ApiResponse`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        /// `message` field from the error body, when there was one.
        message: Option<String>,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected response shape for {context}: expected a list or an object with `data`")]
    UnexpectedShape { context: String, status: u16 },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ClientError {
    /// HTTP status to report for this failure; 500 when no response arrived.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            ClientError::Http(e) => e.status().map_or(500, |s| s.as_u16()),
            ClientError::UnexpectedStatus { status, .. }
            | ClientError::Deserialize { status, .. }
            | ClientError::UnexpectedShape { status, .. } => *status,
            ClientError::InvalidBaseUrl { .. } => 500,
        }
    }

    /// Server-provided message, if the error body carried one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::UnexpectedStatus { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
