//! Failure taxonomy for server exchanges

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every way a single exchange with the game server can fail.
///
/// Neither variant is fatal. Callers log it and keep the last confirmed view.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure, undecodable body, or a snapshot that breaks its invariants.
    #[error("{operation}: transport failure: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    /// The server answered with a well-formed envelope that is not a success.
    #[error("{operation}: server rejected request with status {status:?}{}", detail(.message))]
    Rejected {
        operation: &'static str,
        status: String,
        message: Option<String>,
    },
}

impl ClientError {
    pub fn transport(operation: &'static str, source: impl Into<BoxError>) -> Self {
        ClientError::Transport {
            operation,
            source: source.into(),
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            ClientError::Transport { operation, .. } => operation,
            ClientError::Rejected { operation, .. } => operation,
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Rejected { .. })
    }
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}
