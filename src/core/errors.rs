use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Connection, TLS or body-read failure. Never retried.
    #[error("Transport error: {0}")]
    Transport(String),

    /// 4xx response carrying the exchange's structured error.
    #[error("Client error {status} {name}: {message}")]
    Client {
        status: u16,
        name: String,
        message: String,
    },

    /// 5xx response on the final permitted attempt.
    #[error("Server error: HTTP {status} after {attempts} attempt(s)")]
    Server { status: u16, attempts: u32 },

    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),
}

impl ExchangeError {
    /// Whether the executor may dispatch the same request again after this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// HTTP status attached to the failure, if the exchange produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. }
            | Self::Server { status, .. }
            | Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_server_errors_are_retryable() {
        let server = ExchangeError::Server {
            status: 503,
            attempts: 3,
        };
        let client = ExchangeError::Client {
            status: 400,
            name: "ValidationError".to_string(),
            message: "Invalid orderID".to_string(),
        };

        assert!(server.is_retryable());
        assert!(!client.is_retryable());
        assert!(!ExchangeError::Transport("connection reset".to_string()).is_retryable());
    }

    #[test]
    fn test_display_mentions_status() {
        let error = ExchangeError::Server {
            status: 503,
            attempts: 3,
        };
        assert_eq!(
            error.to_string(),
            "Server error: HTTP 503 after 3 attempt(s)"
        );
        assert_eq!(error.status(), Some(503));
        assert_eq!(ExchangeError::Decode("bad".to_string()).status(), None);
    }
}
