//! Error types for registry operations
//!
//! Every remote operation has a fixed set of service errors (see [`operation`]).
//! Those are wrapped in [`RegistryError`], which adds the failure modes that
//! happen on this side of the wire: credentials, validation, dispatch, parsing.

pub mod handlers;
pub mod operation;

use crate::registry::credentials::CredentialsError;
use std::fmt;
use thiserror::Error;

pub use operation::*;

/// Result alias for a single operation
pub type OperationResult<T, E> = std::result::Result<T, RegistryError<E>>;

/// Result alias for crate-level (non-operation) failures
pub type Result<T> = std::result::Result<T, ClientError>;

/// A typed error payload documented by the service for one operation.
pub trait ServiceError: fmt::Debug + fmt::Display + Send + Sync + Sized + 'static {
    /// Build the typed error from the service's error code, if the code is
    /// part of this operation's error set.
    fn from_code(code: &str, message: String) -> Option<Self>;

    /// Service error code, e.g. `RepositoryNotFoundException`
    fn code(&self) -> &'static str;

    /// Message sent by the service
    fn message(&self) -> &str;
}

/// Error returned by an operation
#[derive(Debug, Error)]
pub enum RegistryError<E> {
    /// One of the errors the service documents for this operation
    #[error("{0}")]
    Service(E),

    /// No usable credentials
    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    /// Request rejected before it was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network or transport failure
    #[error("HTTP dispatch error: {0}")]
    HttpDispatch(String),

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Service error outside this operation's documented set
    #[error("{0}")]
    Unknown(UnknownError),
}

impl<E> RegistryError<E> {
    /// Returns the typed service error, if that is what this is
    pub fn as_service(&self) -> Option<&E> {
        match self {
            RegistryError::Service(err) => Some(err),
            _ => None,
        }
    }

    /// Service error code, when the service supplied one
    pub fn code(&self) -> Option<&str>
    where
        E: ServiceError,
    {
        match self {
            RegistryError::Service(err) => Some(err.code()),
            RegistryError::Unknown(unknown) => unknown.code.as_deref(),
            _ => None,
        }
    }
}

impl<E> From<serde_json::Error> for RegistryError<E> {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Parse(err.to_string())
    }
}

impl<E> From<crate::registry::transport::HttpDispatchError> for RegistryError<E> {
    fn from(err: crate::registry::transport::HttpDispatchError) -> Self {
        RegistryError::HttpDispatch(err.to_string())
    }
}

/// Failed response whose error code is not part of the operation's error set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownError {
    pub status: u16,
    pub code: Option<String>,
    pub message: Option<String>,
    pub body: String,
}

impl fmt::Display for UnknownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => {
                write!(f, "{} (status {}): {}", code, self.status, message)
            }
            (Some(code), None) => write!(f, "{} (status {})", code, self.status),
            (None, _) if self.body.is_empty() => {
                write!(f, "Unexpected response (status {})", self.status)
            }
            (None, _) => write!(f, "Unexpected response (status {}): {}", self.status, self.body),
        }
    }
}

/// Errors outside any single operation: configuration, local I/O, CLI input
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{operation} failed: {message}")]
    Operation { operation: String, message: String },
}

impl ClientError {
    /// Wrap a failed operation so different error sets can share one error type
    pub fn operation<E: fmt::Display>(operation: &str, err: RegistryError<E>) -> Self {
        ClientError::Operation {
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }
}
