//! Error types for the client.

use crate::meta::RateLimit;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error kinds for categorizing API failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    // Construction errors
    /// No credentials were supplied.
    MissingCredentials,
    /// Invalid client configuration.
    InvalidConfiguration,

    // Request-building errors
    /// A parameter value is invalid.
    InvalidParameter,
    /// A required parameter is missing or empty.
    MissingParameter,

    // HTTP taxonomy
    /// Bad credentials (401).
    Unauthorized,
    /// Access forbidden (403).
    Forbidden,
    /// Resource not found (404).
    NotFound,
    /// Resource conflict (409).
    Conflict,
    /// Resource is gone (410).
    Gone,
    /// Request validation failed (422), with per-field detail.
    Validation,
    /// Rate limit exhausted (403 with depleted quota, or 429).
    RateLimitExceeded,
    /// Internal server error (500).
    InternalError,
    /// Bad gateway (502).
    BadGateway,
    /// Service unavailable (503).
    ServiceUnavailable,

    // Transport errors
    /// Connection failed.
    ConnectionFailed,
    /// Request timeout.
    Timeout,
    /// Failed to deserialize a response body.
    Deserialization,

    /// Any other failure.
    Unknown,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "missing_credentials"),
            Self::InvalidConfiguration => write!(f, "invalid_configuration"),
            Self::InvalidParameter => write!(f, "invalid_parameter"),
            Self::MissingParameter => write!(f, "missing_parameter"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Gone => write!(f, "gone"),
            Self::Validation => write!(f, "validation"),
            Self::RateLimitExceeded => write!(f, "rate_limit_exceeded"),
            Self::InternalError => write!(f, "internal_error"),
            Self::BadGateway => write!(f, "bad_gateway"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::Deserialization => write!(f, "deserialization"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Per-field detail from a 422 validation response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    /// Resource the error applies to (e.g. "Issue").
    pub resource: Option<String>,
    /// Offending field name.
    pub field: Option<String>,
    /// Machine-readable error code (e.g. "missing_field").
    pub code: Option<String>,
    /// Human-readable message.
    pub message: Option<String>,
}

/// API error with status, request id, and validation detail.
#[derive(Error, Debug)]
pub struct ApiError {
    /// Error kind.
    kind: ApiErrorKind,
    /// Error message.
    message: String,
    /// HTTP status code.
    status: Option<u16>,
    /// Server-assigned request id.
    request_id: Option<String>,
    /// Documentation URL from the error body.
    documentation_url: Option<String>,
    /// Field-level validation errors (422 responses).
    errors: Vec<FieldError>,
    /// Rate limit snapshot (rate-limit errors).
    rate_limit: Option<RateLimit>,
    /// Underlying cause.
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(code) = self.status {
            write!(f, " (HTTP {})", code)?;
        }
        if let Some(ref id) = self.request_id {
            write!(f, " [request_id: {}]", id)?;
        }
        Ok(())
    }
}

impl ApiError {
    /// Creates a new error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            request_id: None,
            documentation_url: None,
            errors: Vec::new(),
            rate_limit: None,
            cause: None,
        }
    }

    /// Sets the HTTP status code.
    pub fn with_status(mut self, code: u16) -> Self {
        self.status = Some(code);
        self
    }

    /// Sets the server-assigned request id.
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Sets the documentation URL.
    pub fn with_documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    /// Sets the field-level validation errors.
    pub fn with_field_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    /// Sets the rate limit snapshot.
    pub fn with_rate_limit(mut self, limit: RateLimit) -> Self {
        self.rate_limit = Some(limit);
        self
    }

    /// Sets the underlying cause.
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Gets the error kind.
    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }

    /// Gets the HTTP status code.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Gets the request id.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Gets the documentation URL.
    pub fn documentation_url(&self) -> Option<&str> {
        self.documentation_url.as_deref()
    }

    /// Gets the field-level validation errors.
    pub fn field_errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Gets the rate limit snapshot.
    pub fn rate_limit(&self) -> Option<&RateLimit> {
        self.rate_limit.as_ref()
    }

    /// Returns true if this error is a rate-limit error.
    pub fn is_rate_limit(&self) -> bool {
        self.kind == ApiErrorKind::RateLimitExceeded
    }

    /// Maps an HTTP status code to its error kind.
    ///
    /// `rate_limited` marks a 403 whose `x-ratelimit-remaining` header read
    /// zero. The mapping is total: unrecognized statuses become `Unknown`.
    pub fn kind_for_status(status: u16, rate_limited: bool) -> ApiErrorKind {
        match status {
            401 => ApiErrorKind::Unauthorized,
            403 if rate_limited => ApiErrorKind::RateLimitExceeded,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            409 => ApiErrorKind::Conflict,
            410 => ApiErrorKind::Gone,
            422 => ApiErrorKind::Validation,
            429 => ApiErrorKind::RateLimitExceeded,
            500 => ApiErrorKind::InternalError,
            502 => ApiErrorKind::BadGateway,
            503 => ApiErrorKind::ServiceUnavailable,
            _ => ApiErrorKind::Unknown,
        }
    }

    /// Creates an error from an HTTP error response.
    pub fn from_response(
        status: u16,
        rate_limited: bool,
        message: String,
        documentation_url: Option<String>,
        request_id: Option<String>,
    ) -> Self {
        let kind = Self::kind_for_status(status, rate_limited);
        let mut error = Self::new(kind, message).with_status(status);

        if let Some(url) = documentation_url {
            error = error.with_documentation_url(url);
        }
        if let Some(id) = request_id {
            error = error.with_request_id(id);
        }

        error
    }

    // Convenience constructors

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::InvalidConfiguration, message)
    }

    /// Creates an invalid-parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::InvalidParameter, message)
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::NotFound, message).with_status(404)
    }

    /// Creates a rate-limit error carrying the parsed limit snapshot.
    pub fn rate_limit_exceeded(limit: RateLimit) -> Self {
        Self::new(ApiErrorKind::RateLimitExceeded, "Rate limit exceeded")
            .with_status(403)
            .with_rate_limit(limit)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Timeout, message)
    }

    /// Creates a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Deserialization, message)
    }
}

/// Rejects empty required string parameters before any I/O happens.
pub(crate) fn require(name: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::new(
            ApiErrorKind::MissingParameter,
            format!("parameter `{}` must not be empty", name),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ApiError::new(ApiErrorKind::NotFound, "Repository not found")
            .with_status(404)
            .with_request_id("abc123");

        let display = format!("{}", error);
        assert!(display.contains("not_found"));
        assert!(display.contains("Repository not found"));
        assert!(display.contains("404"));
        assert!(display.contains("abc123"));
    }

    #[test]
    fn test_status_mapping_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(ApiError::kind_for_status(401, false), ApiErrorKind::Unauthorized);
            assert_eq!(ApiError::kind_for_status(403, false), ApiErrorKind::Forbidden);
            assert_eq!(ApiError::kind_for_status(403, true), ApiErrorKind::RateLimitExceeded);
            assert_eq!(ApiError::kind_for_status(404, false), ApiErrorKind::NotFound);
            assert_eq!(ApiError::kind_for_status(422, false), ApiErrorKind::Validation);
            assert_eq!(ApiError::kind_for_status(429, false), ApiErrorKind::RateLimitExceeded);
            assert_eq!(ApiError::kind_for_status(500, false), ApiErrorKind::InternalError);
        }
    }

    #[test]
    fn test_mapping_is_total() {
        for status in 100u16..600 {
            // Must never panic, whatever the status.
            let _ = ApiError::kind_for_status(status, false);
            let _ = ApiError::kind_for_status(status, true);
        }
        assert_eq!(ApiError::kind_for_status(418, false), ApiErrorKind::Unknown);
    }

    #[test]
    fn test_from_response() {
        let error = ApiError::from_response(
            404,
            false,
            "Not Found".to_string(),
            Some("https://docs.github.com".to_string()),
            Some("req-123".to_string()),
        );

        assert_eq!(*error.kind(), ApiErrorKind::NotFound);
        assert_eq!(error.status(), Some(404));
        assert_eq!(error.documentation_url(), Some("https://docs.github.com"));
        assert_eq!(error.request_id(), Some("req-123"));
    }

    #[test]
    fn test_field_errors() {
        let error = ApiError::from_response(422, false, "Validation Failed".into(), None, None)
            .with_field_errors(vec![FieldError {
                resource: Some("Issue".into()),
                field: Some("title".into()),
                code: Some("missing_field".into()),
                message: None,
            }]);

        assert_eq!(*error.kind(), ApiErrorKind::Validation);
        assert_eq!(error.field_errors().len(), 1);
        assert_eq!(error.field_errors()[0].field.as_deref(), Some("title"));
    }

    #[test]
    fn test_require() {
        assert!(require("owner", "octocat").is_ok());
        let err = require("owner", "").unwrap_err();
        assert_eq!(*err.kind(), ApiErrorKind::MissingParameter);
        assert!(require("owner", "   ").is_err());
    }
}
