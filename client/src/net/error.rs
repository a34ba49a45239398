//! Server error bodies and client-side API errors.
//!
//! The server answers failures in two shapes: route-level bodies such as
//! `{"error": "csrf_invalid"}`, and a standardized envelope
//! `{"error": true, "message": "...", "code": 1006}`. Both are decoded into
//! [`ErrorBody`] so callers never branch on the raw JSON.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

use super::transport::{HttpResponse, TransportError};

/// Application error codes carried by the standardized envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    AuthRequired,
    InvalidCredentials,
    SessionExpired,
    InsufficientPermissions,
    CsrfMissing,
    CsrfInvalid,
    RateLimitExceeded,
    InvalidInput,
    MissingRequiredField,
    InvalidFormat,
    ContentBlocked,
    ContentNotFound,
    InternalError,
    ServiceUnavailable,
    DatabaseError,
    ExternalServiceError,
}

impl ErrorCode {
    pub fn from_code(code: u64) -> Option<Self> {
        let known = match code {
            1001 => Self::AuthRequired,
            1002 => Self::InvalidCredentials,
            1003 => Self::SessionExpired,
            1004 => Self::InsufficientPermissions,
            1005 => Self::CsrfMissing,
            1006 => Self::CsrfInvalid,
            1101 => Self::RateLimitExceeded,
            1201 => Self::InvalidInput,
            1202 => Self::MissingRequiredField,
            1203 => Self::InvalidFormat,
            1301 => Self::ContentBlocked,
            1302 => Self::ContentNotFound,
            1500 => Self::InternalError,
            1501 => Self::ServiceUnavailable,
            1502 => Self::DatabaseError,
            1503 => Self::ExternalServiceError,
            _ => return None,
        };
        Some(known)
    }

    pub fn code(self) -> u16 {
        match self {
            Self::AuthRequired => 1001,
            Self::InvalidCredentials => 1002,
            Self::SessionExpired => 1003,
            Self::InsufficientPermissions => 1004,
            Self::CsrfMissing => 1005,
            Self::CsrfInvalid => 1006,
            Self::RateLimitExceeded => 1101,
            Self::InvalidInput => 1201,
            Self::MissingRequiredField => 1202,
            Self::InvalidFormat => 1203,
            Self::ContentBlocked => 1301,
            Self::ContentNotFound => 1302,
            Self::InternalError => 1500,
            Self::ServiceUnavailable => 1501,
            Self::DatabaseError => 1502,
            Self::ExternalServiceError => 1503,
        }
    }
}

/// The two CSRF rejections the dispatcher recovers from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsrfFailure {
    /// No token reached the server.
    Missing,
    /// A token arrived but did not match the session.
    Invalid,
}

/// Decoded error body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorBody {
    /// Route-level error identifier (`"csrf_missing"`, `"forbidden"`, ...).
    pub error: Option<String>,
    /// Numeric code from the standardized envelope.
    pub code: Option<ErrorCode>,
    /// Human-readable message, when the server sent one.
    pub message: Option<String>,
}

impl ErrorBody {
    /// Decode a JSON error value. Anything that is not an object yields an
    /// empty body.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        let error = map.get("error").and_then(Value::as_str).map(ToOwned::to_owned);
        let code = map.get("code").and_then(Value::as_u64).and_then(ErrorCode::from_code);
        let message = map
            .get("message")
            .or_else(|| map.get("detail"))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);
        Self { error, code, message }
    }

    /// Decode a response body, ignoring bodies that are not JSON.
    pub fn from_response(response: &HttpResponse) -> Option<Self> {
        response
            .json::<Value>()
            .ok()
            .map(|value| Self::from_value(&value))
    }

    pub fn csrf_failure(&self) -> Option<CsrfFailure> {
        match (self.error.as_deref(), self.code) {
            (Some("csrf_missing"), _) | (_, Some(ErrorCode::CsrfMissing)) => Some(CsrfFailure::Missing),
            (Some("csrf_invalid"), _) | (_, Some(ErrorCode::CsrfInvalid)) => Some(CsrfFailure::Invalid),
            _ => None,
        }
    }

    /// Best text to show a person.
    pub fn describe(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

/// Failure of a typed API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("server returned {status}: {message}")]
    Status {
        status: u16,
        code: Option<ErrorCode>,
        error: Option<String>,
        message: String,
    },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    Invalid(#[from] crate::util::validation::ValidationError),
}

impl ApiError {
    /// Build the status variant from a non-success response.
    pub fn from_response(response: &HttpResponse) -> Self {
        let body = ErrorBody::from_response(response).unwrap_or_default();
        let message = body
            .describe()
            .map_or_else(|| format!("HTTP {}", response.status), ToOwned::to_owned);
        Self::Status {
            status: response.status,
            code: body.code,
            error: body.error,
            message,
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected a CSRF token.
    pub fn is_csrf(&self) -> bool {
        match self {
            Self::Status { code, error, .. } => ErrorBody {
                error: error.clone(),
                code: *code,
                message: None,
            }
            .csrf_failure()
            .is_some(),
            _ => false,
        }
    }
}
