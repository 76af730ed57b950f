//! Extractors for the `/radios` handlers.
//!
//! Each one maps framework rejections into [`AppError`] so clients always
//! get a JSON error body.

use axum::extract::{FromRequest, FromRequestParts, Multipart, Path, Query, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::{Form, Json};
use radios_core::types::DbId;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;

/// Radio write payload.
///
/// Accepts `application/json`, `application/x-www-form-urlencoded` and
/// text-only `multipart/form-data`. A missing or unknown content type is
/// parsed as JSON.
#[derive(Debug, Clone)]
pub struct RadioBody<T>(pub T);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Multipart,
}

fn body_kind(req: &Request) -> BodyKind {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/x-www-form-urlencoded") {
        BodyKind::Form
    } else if content_type.starts_with("multipart/form-data") {
        BodyKind::Multipart
    } else {
        BodyKind::Json
    }
}

impl<S, T> FromRequest<S> for RadioBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(&req) {
            BodyKind::Form => {
                let Form(value) = Form::<T>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                Ok(Self(value))
            }
            BodyKind::Multipart => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                let fields = collect_text_fields(multipart).await?;
                let value = serde_json::from_value(Value::Object(fields))
                    .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?;
                Ok(Self(value))
            }
            BodyKind::Json => {
                let Json(value) = Json::<T>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                Ok(Self(value))
            }
        }
    }
}

/// Read every text part into a JSON object. File parts are refused.
async fn collect_text_fields(mut multipart: Multipart) -> Result<Map<String, Value>, AppError> {
    let mut fields = Map::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if field.file_name().is_some() {
            return Err(AppError::BadRequest(format!(
                "Unexpected file field '{name}'"
            )));
        }
        let text = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if !name.is_empty() {
            fields.insert(name, Value::String(text));
        }
    }

    Ok(fields)
}

/// The `{id}` path segment of a radio route.
///
/// A segment that is not an integer cannot name a stored radio, so it is
/// reported as not found rather than as a malformed request.
#[derive(Debug, Clone, Copy)]
pub struct RadioId(pub DbId);

impl<S> FromRequestParts<S> for RadioId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        raw.trim()
            .parse::<DbId>()
            .map(Self)
            .map_err(|_| AppError::UnknownId {
                entity: "Radio",
                raw,
            })
    }
}

/// Query-string parameters with JSON rejections.
#[derive(Debug, Clone)]
pub struct ListParams<T>(pub T);

impl<S, T> FromRequestParts<S> for ListParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(Self(value))
    }
}
