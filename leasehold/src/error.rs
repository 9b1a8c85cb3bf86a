//! Error types using thiserror 2.0.
//!
//! Every failure mode of the secret store and the lease manager is a variant
//! here, with a retryability classification used by the client's retry policy.

use thiserror::Error;

/// Errors produced by the lease manager and the Vault client.
#[derive(Error, Debug)]
pub enum Error {
    /// Request configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The store rejected our credentials
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The store could not be reached, or answered with a server error
    #[error("Vault unavailable: {0}")]
    Unavailable(String),

    /// The store throttled the request
    #[error("Rate limited")]
    RateLimited,

    /// The current token may not read the requested path
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// No secret lives at the requested path
    #[error("Secret not found at path: {0}")]
    SecretNotFound(String),

    /// The store answered with success but omitted fields we require
    #[error("Malformed store response: {0}")]
    MalformedResponse(String),

    /// Renewal was requested for a lease the store will not renew
    #[error("Lease {0} is not renewable")]
    UnrenewableLease(String),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for lease operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if the error is transient and worth retrying.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::RateLimited | Self::Http(_))
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an authentication failed error.
    #[must_use]
    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::AuthenticationFailed(msg.into())
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a secret not found error.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::SecretNotFound(path.into())
    }

    /// Create a malformed response error.
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create an unrenewable lease error.
    #[must_use]
    pub fn unrenewable(lease_id: impl Into<String>) -> Self {
        Self::UnrenewableLease(lease_id.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unavailable("connection refused");
        assert_eq!(err.to_string(), "Vault unavailable: connection refused");

        let err = Error::unrenewable("database/creds/reader/abc123");
        assert_eq!(
            err.to_string(),
            "Lease database/creds/reader/abc123 is not renewable"
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(Error::Unavailable("timeout".to_string()).is_retryable());
        assert!(Error::RateLimited.is_retryable());
        assert!(!Error::SecretNotFound("path".to_string()).is_retryable());
        assert!(!Error::auth_failed("bad role").is_retryable());
        assert!(!Error::malformed("no lease_duration").is_retryable());
        assert!(!Error::config("unknown request type").is_retryable());
    }
}
