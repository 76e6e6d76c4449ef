use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::validation::FormErrors;

/// Error body returned by the brand management API.
///
/// Only `message` and `details` are consumed; the remaining fields are kept
/// for logging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g. "Not Found", "Conflict")
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable error description, shown to the operator verbatim
    #[serde(default)]
    pub message: Option<String>,
    /// Per-field validation messages, present on 400 responses
    #[serde(default)]
    pub details: Option<HashMap<String, String>>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation rejected: {errors}")]
    ValidationRejected {
        message: Option<String>,
        errors: FormErrors,
    },

    #[error("Not found: {}", .message.as_deref().unwrap_or("record no longer exists"))]
    NotFound { message: Option<String> },

    #[error("Server rejected request ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    ServerRejected { status: u16, message: Option<String> },

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServiceError {
    /// Client-side pre-flight failure; no request was sent.
    pub fn rejected_locally(errors: FormErrors) -> Self {
        ServiceError::ValidationRejected {
            message: None,
            errors,
        }
    }

    /// Maps a non-success status and its (optional) body onto the taxonomy.
    pub fn from_status(status: StatusCode, body: Option<ErrorResponse>) -> Self {
        let body = body.unwrap_or_default();
        let message = body.message.filter(|msg| !msg.trim().is_empty());

        match status {
            StatusCode::NOT_FOUND => ServiceError::NotFound { message },
            StatusCode::BAD_REQUEST => match body.details {
                Some(details) if !details.is_empty() => ServiceError::ValidationRejected {
                    message,
                    errors: FormErrors::from_server_details(&details),
                },
                _ => ServiceError::ServerRejected {
                    status: status.as_u16(),
                    message,
                },
            },
            _ => ServiceError::ServerRejected {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// The message supplied by the server, if there was one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::ValidationRejected { message, .. }
            | Self::NotFound { message }
            | Self::ServerRejected { message, .. } => message.as_deref(),
            Self::NetworkFailure(_) | Self::InvalidResponse(_) | Self::InternalError(_) => None,
        }
    }

    /// Text for a user notification: the server's message or `fallback`.
    pub fn notification(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    /// Field errors carried by a validation rejection.
    pub fn field_errors(&self) -> Option<&FormErrors> {
        match self {
            Self::ValidationRejected { errors, .. } => Some(errors),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::InvalidResponse(err.to_string())
        } else {
            ServiceError::NetworkFailure(err.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::rejected_locally(FormErrors::from(&err))
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServiceError::InternalError(err.to_string())
    }
}

// Result extensions for easier error handling
pub trait ResultExt<T> {
    fn map_err_to_service(self) -> Result<T, ServiceError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<ServiceError>,
{
    fn map_err_to_service(self) -> Result<T, ServiceError> {
        self.map_err(|e| e.into())
    }
}
