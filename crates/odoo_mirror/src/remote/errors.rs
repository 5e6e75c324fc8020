use thiserror::Error;

/// Errors raised while talking to the remote system.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The remote answered with an application-level error.
    #[error("API error: {message}")]
    Api { message: String },

    /// Credentials were rejected, or authentication returned no user.
    #[error("Authentication failed: {message}")]
    AuthFailed { message: String },

    /// Connection, timeout, or other transport failure.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The response could not be decoded into the expected shape.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },
}

impl RemoteError {
    #[inline]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    #[inline]
    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::AuthFailed {
            message: message.into(),
        }
    }

    #[inline]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    #[inline]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    #[inline]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Only transport failures are worth another attempt; the remote gave a
    /// definite answer for everything else.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

pub type Result<T> = std::result::Result<T, RemoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(RemoteError::network("connection reset").is_retryable());
        assert!(!RemoteError::api("boom").is_retryable());
        assert!(!RemoteError::auth_failed("bad password").is_retryable());
        assert!(!RemoteError::invalid_response("not json").is_retryable());
        assert!(!RemoteError::not_found("res.partner 4").is_retryable());
    }

    #[test]
    fn display_includes_context() {
        assert_eq!(
            RemoteError::auth_failed("invalid credentials").to_string(),
            "Authentication failed: invalid credentials"
        );
        assert_eq!(
            RemoteError::not_found("account.move 12").to_string(),
            "Not found: account.move 12"
        );
    }
}
