//! Web errors module

use melt_container::ContainerError;
use thiserror::Error;

use crate::http::HttpMethod;

/// Errors raised while building routes or handling requests
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Duplicate route: {method} {pattern}")]
    DuplicateRoute {
        method: HttpMethod,
        pattern: String,
    },

    #[error("No handler for {method} {path}")]
    HandlerNotFound { method: HttpMethod, path: String },

    #[error("Missing required parameter '{name}'")]
    MissingParam { name: String },

    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    #[error("Missing path variable '{name}'")]
    MissingPathVariable { name: String },

    #[error("Serialization error: {source}")]
    SerializationError { source: serde_json::Error },

    #[error("Handler failed: {reason}")]
    HandlerFailed { reason: String },

    #[error("Container error: {source}")]
    ContainerError { source: ContainerError },
}

impl From<serde_json::Error> for WebError {
    fn from(err: serde_json::Error) -> Self {
        WebError::SerializationError { source: err }
    }
}

impl From<ContainerError> for WebError {
    fn from(err: ContainerError) -> Self {
        WebError::ContainerError { source: err }
    }
}

impl WebError {
    /// HTTP status this error maps to when it escapes a handler.
    pub fn status(&self) -> u16 {
        match self {
            WebError::MissingParam { .. }
            | WebError::InvalidParam { .. }
            | WebError::MissingPathVariable { .. } => 400,
            WebError::HandlerNotFound { .. } => 404,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let missing = WebError::MissingParam {
            name: "name".to_string(),
        };
        assert_eq!(missing.status(), 400);

        let not_found = WebError::HandlerNotFound {
            method: HttpMethod::Get,
            path: "/nope".to_string(),
        };
        assert_eq!(not_found.status(), 404);

        let failed = WebError::HandlerFailed {
            reason: "boom".to_string(),
        };
        assert_eq!(failed.status(), 500);
    }

    #[test]
    fn test_container_errors_convert() {
        let err: WebError = ContainerError::NotFound {
            name: "userService".to_string(),
        }
        .into();
        assert!(matches!(err, WebError::ContainerError { .. }));
        assert_eq!(err.status(), 500);
    }
}
