//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no router or
//! store is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use radios_api::error::AppError;
use radios_core::error::CoreError;
use radios_core::radio::{DuplicateField, ExistingRadio};
use radios_db::store::{StoreError, STREAM_URL_CONSTRAINT};

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// CoreError variants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Radio",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Radio with id 42 not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("Invalid sort field: foo".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Invalid sort field: foo");
    assert!(json.get("errors").is_none());
}

#[tokio::test]
async fn invalid_fields_lists_each_field() {
    let err = AppError::Core(CoreError::InvalidFields {
        message: "All fields are required: image, name, stream_url, genre".into(),
        errors: vec!["name is required".into(), "genre is required".into()],
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(
        json["errors"],
        serde_json::json!(["name is required", "genre is required"])
    );
}

#[tokio::test]
async fn duplicate_error_echoes_existing_radio() {
    let field = DuplicateField::Name;
    let err = AppError::Core(CoreError::Duplicate {
        field,
        message: field.message(false).to_string(),
        existing: ExistingRadio {
            name: "Rock FM".into(),
            genre: "Rock".into(),
        },
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["field"], "name");
    assert_eq!(json["error"], "A radio with this name already exists");
    assert_eq!(
        json["existing"],
        serde_json::json!({"name": "Rock FM", "genre": "Rock"})
    );
}

// ---------------------------------------------------------------------------
// HTTP-specific variants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

#[tokio::test]
async fn unknown_id_returns_404_with_raw_segment() {
    let err = AppError::UnknownId {
        entity: "Radio",
        raw: "65f0c0ffee".into(),
    };

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Radio with id 65f0c0ffee not found");
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stream_url_index_violation_returns_409() {
    let err = AppError::Store(StoreError::UniqueViolation {
        constraint: STREAM_URL_CONSTRAINT.to_string(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["field"], "stream_url");
    assert_eq!(json["error"], "A radio with this stream URL already exists");
}

#[tokio::test]
async fn other_unique_violation_returns_409() {
    let err = AppError::Store(StoreError::UniqueViolation {
        constraint: "uq_something_else".to_string(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json.get("field").is_none());
    assert!(json["error"].as_str().unwrap().contains("uq_something_else"));
}

#[tokio::test]
async fn database_error_returns_500_without_details() {
    let err = AppError::Store(StoreError::Database(sqlx::Error::PoolTimedOut));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}
