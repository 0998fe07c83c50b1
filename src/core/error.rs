//! Typed error handling for the payables API
//!
//! Every failure surfaced to a caller goes through [`ApiError`], which maps
//! each category to an HTTP status code, a stable error code for programmatic
//! handling, and a structured JSON body.
//!
//! # Error Categories
//!
//! - `Validation`: malformed input shape or value → 400
//! - `Conflict`: duplicate unique key (tax id, barcode) or a repeated
//!   pay transition → 400
//! - `NotFound`: referenced company or invoice missing → 404
//! - `Storage`: storage backend failure → 500
//! - `Internal`: anything else that should not happen in normal operation → 500
//!
//! An empty result set for a requested year is *not* an error; the report
//! layer surfaces it as an explicit "no data" value instead.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the payables API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input failed validation at the HTTP boundary
    #[error("{message}")]
    Validation { message: String },

    /// A unique constraint or a one-shot state transition was violated
    #[error("{message}")]
    Conflict {
        code: &'static str,
        message: String,
    },

    /// A referenced record does not exist
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: &'static str, id: Uuid },

    /// The storage backend failed
    #[error("storage error: {message}")]
    Storage { message: String },

    /// Internal errors (should not happen in normal operation)
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str, id: Uuid) -> Self {
        ApiError::NotFound { resource, id }
    }

    /// A company with the given tax id is already registered
    pub fn tax_id_taken(tax_id: &str) -> Self {
        ApiError::Conflict {
            code: "TAX_ID_TAKEN",
            message: format!("a company with tax id '{}' is already registered", tax_id),
        }
    }

    /// An invoice with the given barcode is already registered
    pub fn barcode_taken(barcode: &str) -> Self {
        ApiError::Conflict {
            code: "BARCODE_TAKEN",
            message: format!("an invoice with barcode '{}' is already registered", barcode),
        }
    }

    /// The invoice already has a payment date; the pay transition happens once
    pub fn already_paid(id: Uuid) -> Self {
        ApiError::Conflict {
            code: "ALREADY_PAID",
            message: format!("invoice '{}' is already paid", id),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// Conflicts are reported as 400 rather than 409: the API contract treats
    /// duplicate keys the same as any other rejected client input.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Conflict { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Conflict { code, .. } => code,
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Storage { .. } => "STORAGE_ERROR",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::NotFound { resource, id } => Some(serde_json::json!({
                "resource": resource,
                "id": id.to_string(),
            })),
            _ => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::validation(errors.to_string())
    }
}
