//! # Error Types Module
//!
//! This module defines the error types used by the external services and the
//! persistence layer. Service failures are soft at the planner level: they are
//! logged and the affected state is left unchanged.

/// Errors raised by the text-generation and image-search services
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The service is not configured
    MissingApiKey(&'static str),
    /// Transport errors (connection, timeout, TLS)
    Network(String),
    /// The service answered with a non-success status
    Api { status: u16, message: String },
    /// The service answered without any usable content
    EmptyResponse,
    /// The content could not be interpreted
    Parse(String),
    /// Another request of the same kind is already in flight
    Busy,
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::MissingApiKey(var) => write!(f, "Missing API key: set {var}"),
            ServiceError::Network(msg) => write!(f, "Network error: {msg}"),
            ServiceError::Api { status, message } => write!(f, "API error {status}: {message}"),
            ServiceError::EmptyResponse => write!(f, "Empty response from service"),
            ServiceError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ServiceError::Busy => write!(f, "Another request is already in progress"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ServiceError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None if err.is_decode() => ServiceError::Parse(err.to_string()),
            None => ServiceError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Parse(err.to_string())
    }
}

/// Errors raised by the key-value persistence layer
#[derive(Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    Io(std::io::Error),
    /// A value could not be encoded or decoded
    Serialization(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "Storage I/O error: {err}"),
            StorageError::Serialization(err) => write!(f, "Storage serialization error: {err}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            StorageError::Serialization(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err)
    }
}

impl From<tempfile::PersistError> for StorageError {
    fn from(err: tempfile::PersistError) -> Self {
        StorageError::Io(err.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        assert_eq!(
            ServiceError::MissingApiKey("GEMINI_API_KEY").to_string(),
            "Missing API key: set GEMINI_API_KEY"
        );
        assert_eq!(
            ServiceError::Api {
                status: 429,
                message: "quota".to_string()
            }
            .to_string(),
            "API error 429: quota"
        );
        assert_eq!(
            ServiceError::Busy.to_string(),
            "Another request is already in progress"
        );
    }

    #[test]
    fn test_json_errors_convert() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(ServiceError::from(err), ServiceError::Parse(_)));

        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let storage = StorageError::from(err);
        assert!(matches!(storage, StorageError::Serialization(_)));
        assert!(std::error::Error::source(&storage).is_some());
    }
}
