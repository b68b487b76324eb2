//! Structured errors for the HTTP surface.
//!
//! The calculator itself never fails; these cover the lookups around it
//! (locales, exchange presets) and request payloads that make no sense.
//!
//! # Status Codes
//!
//! | Code | HTTP | Usage |
//! |------|------|-------|
//! | `INVALID_REQUEST` | 400 | Negative price, balance or similar |
//! | `UNSUPPORTED_LOCALE` | 400 | Locale tag not in the supported list |
//! | `EXCHANGE_NOT_FOUND` | 404 | Exchange preset name unknown |

use std::collections::HashMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes returned by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request values out of range.
    InvalidRequest,
    /// Locale tag not supported.
    UnsupportedLocale,
    /// No exchange preset with that name.
    ExchangeNotFound,
}

impl ErrorCode {
    /// HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest | Self::UnsupportedLocale => StatusCode::BAD_REQUEST,
            Self::ExchangeNotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Machine-readable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::UnsupportedLocale => "UNSUPPORTED_LOCALE",
            Self::ExchangeNotFound => "EXCHANGE_NOT_FOUND",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// An API error with context.
#[derive(Debug, Error)]
pub struct EngineError {
    code: ErrorCode,
    message: String,
    context: Vec<(String, String)>,
}

impl EngineError {
    /// Create a new error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Convert to the JSON error body.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        HttpErrorResponse {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
            details: self.context.iter().cloned().collect(),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Additional details.
    pub details: HashMap<String, String>,
}

/// Convenience constructors for common errors.
impl EngineError {
    /// Out-of-range request value.
    #[must_use]
    pub fn invalid_request(field: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message).with_context("field", field)
    }

    /// Unknown locale tag.
    #[must_use]
    pub fn unsupported_locale(locale: &str) -> Self {
        Self::new(
            ErrorCode::UnsupportedLocale,
            format!("Locale {locale} is not supported"),
        )
        .with_context("locale", locale)
    }

    /// Unknown exchange preset.
    #[must_use]
    pub fn exchange_not_found(exchange: &str) -> Self {
        Self::new(
            ErrorCode::ExchangeNotFound,
            format!("Exchange {exchange} not found"),
        )
        .with_context("exchange", exchange)
    }
}
