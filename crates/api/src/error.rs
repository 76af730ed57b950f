use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use radios_core::error::CoreError;
use radios_core::radio::DuplicateField;
use radios_db::store::{StoreError, STREAM_URL_CONSTRAINT};
use serde_json::{json, Map, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{ "error": ..., "code": ... }`, with `errors` on
/// field validation failures and `existing` on duplicates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `radios_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A record store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A path id that cannot name any record, kept as the raw segment.
    #[error("Unknown {entity} id: {raw}")]
    UnknownId { entity: &'static str, raw: String },
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut extra = Map::new();

        let (status, code, message) = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
                CoreError::InvalidFields { message, errors } => {
                    extra.insert("errors".into(), json!(errors));
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
                }
                CoreError::Duplicate {
                    field,
                    message,
                    existing,
                } => {
                    extra.insert("field".into(), json!(field.as_str()));
                    extra.insert("existing".into(), json!(existing));
                    (StatusCode::CONFLICT, "CONFLICT", message)
                }
            },

            // --- Store errors ---
            AppError::Store(err) => classify_store_error(&err, &mut extra),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::UnknownId { entity, raw } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {raw} not found"),
            ),
        };

        let mut body = Map::new();
        body.insert("error".into(), Value::String(message));
        body.insert("code".into(), Value::String(code.into()));
        body.extend(extra);

        (status, axum::Json(Value::Object(body))).into_response()
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - Unique violations map to 409; the stream URL index gets the same
///   message as the application-level duplicate check.
/// - Everything else maps to 500 with a sanitized message.
fn classify_store_error(
    err: &StoreError,
    extra: &mut Map<String, Value>,
) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::UniqueViolation { constraint } if constraint == STREAM_URL_CONSTRAINT => {
            let field = DuplicateField::StreamUrl;
            extra.insert("field".into(), json!(field.as_str()));
            (StatusCode::CONFLICT, "CONFLICT", field.message(false).to_string())
        }
        StoreError::UniqueViolation { constraint } => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        StoreError::Database(db_err) => {
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
