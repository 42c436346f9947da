//! Client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// PostgreSQL "relation does not exist": the catalog table is missing
pub const RELATION_MISSING_CODE: &str = "42P01";

/// PostgreSQL "canceling statement due to statement timeout"
pub const STATEMENT_TIMEOUT_CODE: &str = "57014";

/// Message fragments that identify a dropped or blocked connection
const NETWORK_SIGNATURES: &[&str] = &["Failed to fetch", "NetworkError"];

/// How the sync controller reacts to a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Expected to clear up with time: retry, then degrade
    Transient,
    /// Fixed misconfiguration: never retried
    Structural,
    /// Anything else: no retry
    Other,
}

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote store answered with an error payload
    #[error("Store error {code}: {message}")]
    Store {
        code: String,
        message: String,
        status: Option<u16>,
    },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration is unusable
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Build a store error from a `(code, message)` pair
    pub fn store(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            code: code.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Classify for retry/fallback decisions
    pub fn class(&self) -> ErrorClass {
        match self {
            ClientError::Http(e) => {
                if e.is_timeout() || e.is_connect() || e.is_request() {
                    ErrorClass::Transient
                } else if e.status().is_some_and(|s| s.is_server_error()) {
                    ErrorClass::Transient
                } else {
                    ErrorClass::Other
                }
            }
            ClientError::Store {
                code,
                message,
                status,
            } => {
                if code == RELATION_MISSING_CODE {
                    ErrorClass::Structural
                } else if code == STATEMENT_TIMEOUT_CODE
                    || is_server_error_code(code)
                    || status.is_some_and(|s| s >= 500)
                    || is_network_message(message)
                {
                    ErrorClass::Transient
                } else {
                    ErrorClass::Other
                }
            }
            ClientError::InvalidResponse(_)
            | ClientError::Serialization(_)
            | ClientError::Config(_) => ErrorClass::Other,
        }
    }

    /// Whether the failure looks like the full payload was too heavy to
    /// serve, in which case a lighter projection is worth one try even
    /// without retrying.
    pub fn suggests_lighter_query(&self) -> bool {
        match self {
            ClientError::Http(e) => {
                e.is_timeout() || e.status().is_some_and(|s| s.as_u16() == 413)
            }
            ClientError::Store {
                code,
                message,
                status,
            } => {
                let message = message.to_lowercase();
                code == STATEMENT_TIMEOUT_CODE
                    || *status == Some(413)
                    || message.contains("timeout")
                    || message.contains("too large")
            }
            _ => false,
        }
    }
}

fn is_server_error_code(code: &str) -> bool {
    code.parse::<u16>().is_ok_and(|c| (500..600).contains(&c))
}

fn is_network_message(message: &str) -> bool {
    NETWORK_SIGNATURES.iter().any(|sig| message.contains(sig))
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let code = match &err {
            ClientError::Http(e) if e.is_timeout() => ErrorCode::StoreTimeout,
            ClientError::Store { code, .. } if code == RELATION_MISSING_CODE => {
                ErrorCode::StoreMissing
            }
            ClientError::Store { code, .. } if code == STATEMENT_TIMEOUT_CODE => {
                ErrorCode::StoreTimeout
            }
            ClientError::Config(_) => ErrorCode::InvalidRequest,
            ClientError::InvalidResponse(_) | ClientError::Serialization(_) => {
                ErrorCode::InvalidFormat
            }
            _ => ErrorCode::StoreUnavailable,
        };
        AppError::with_message(code, err.to_string())
    }
}
