//! Error types for projections, rate providers, sessions and file loaders

use thiserror::Error;

/// Validation failure for projection inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// A numeric input was out of range or not finite
    #[error("invalid input for `{field}`: {reason}")]
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
        /// Human readable explanation
        reason: String,
    },
}

impl ProjectionError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the field that failed validation
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidInput { field, .. } => field,
        }
    }
}

/// Errors raised by price-history providers.
///
/// These never leave the rate resolver: every variant is converted into a
/// fallback resolution carrying the error text as its message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// No API key was configured for a provider that needs one
    #[error("{provider}: API key not configured")]
    MissingCredentials { provider: String },

    /// The request to the provider timed out
    #[error("{provider}: request timed out")]
    Timeout { provider: String },

    /// The provider rejected the API key (HTTP 401)
    #[error("{provider}: invalid or missing API key")]
    Unauthorized { provider: String },

    /// The provider is throttling requests (HTTP 429)
    #[error("{provider}: rate limited")]
    RateLimited { provider: String },

    /// The provider answered with a non-success HTTP status
    #[error("{provider}: HTTP {status}: {message}")]
    Status {
        provider: String,
        status: u16,
        message: String,
    },

    /// The provider reported an error in its payload
    #[error("{provider}: {message}")]
    Api { provider: String, message: String },

    /// The payload could not be interpreted
    #[error("{provider}: malformed response: {message}")]
    Malformed { provider: String, message: String },

    /// Connection-level failure
    #[error("{provider}: network error: {message}")]
    Network { provider: String, message: String },
}

/// Failures surfaced by [`crate::session::CalculationSession::run`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Another calculation is already running on this session
    #[error("a calculation is already running on this session")]
    Busy,

    /// The running calculation was cancelled before projecting
    #[error("calculation cancelled")]
    Cancelled,

    /// The projection inputs were rejected
    #[error(transparent)]
    InvalidInput(#[from] ProjectionError),
}

/// Errors from file-backed loaders (rate tables, record batches, config).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid data: {0}")]
    Invalid(String),

    #[error("price provider setup failed: {0}")]
    Provider(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_names_field() {
        let err = ProjectionError::invalid("horizon_months", "must be at least 1");
        assert_eq!(err.field(), "horizon_months");
        assert_eq!(
            err.to_string(),
            "invalid input for `horizon_months`: must be at least 1"
        );
    }

    #[test]
    fn test_session_error_wraps_projection_error() {
        let err: SessionError = ProjectionError::invalid("monthly_rate", "must be greater than -1").into();
        assert!(matches!(err, SessionError::InvalidInput(_)));
        assert!(err.to_string().contains("monthly_rate"));
    }
}
