//! Handlers for the `/radios` resource.
//!
//! Writes run a read-before-write duplicate check on `name` (per the
//! configured [`NameUniqueness`](radios_core::radio::NameUniqueness)) and on
//! `stream_url`. The check is not atomic; the unique index on `stream_url`
//! is the only hard guarantee.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use radios_core::error::CoreError;
use radios_core::pagination::{PageRequest, Pagination};
use radios_core::radio::{invalid_fields, DuplicateField, RadioSort, REQUIRED_FIELDS};
use radios_core::types::DbId;
use radios_db::models::radio::{
    CreateRadio, Radio, RadioFilter, RadioLookup, RadioQuery, UpdateRadio,
};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{ListParams, RadioBody, RadioId};
use crate::query::RadioListParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Radio", id })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/radios?page=&limit=&genre=&search=&sort=
///
/// The page and the total count are fetched concurrently.
pub async fn list(
    State(state): State<AppState>,
    ListParams(params): ListParams<RadioListParams>,
) -> AppResult<impl IntoResponse> {
    let page = PageRequest::from_raw(params.page.as_deref(), params.limit.as_deref());
    let sort = RadioSort::parse(params.sort.as_deref())?;
    let query = RadioQuery {
        filter: RadioFilter::new(params.genre, params.search),
        sort,
        skip: page.skip(),
        limit: page.limit,
    };

    let (radios, total) = tokio::try_join!(
        state.store.find(&query),
        state.store.count(&query.filter)
    )?;

    tracing::debug!(returned = radios.len(), total, page = page.page, "Listed radios");

    Ok(Json(PaginatedResponse {
        data: radios,
        pagination: Pagination::new(page, total),
    }))
}

/// GET /api/radios/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RadioId(id): RadioId,
) -> AppResult<impl IntoResponse> {
    let radio = state.store.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: radio }))
}

/// POST /api/radios
pub async fn create(
    State(state): State<AppState>,
    RadioBody(input): RadioBody<CreateRadio>,
) -> AppResult<impl IntoResponse> {
    let input = input.normalized();
    input.validate().map_err(|e| invalid_fields(&e))?;

    ensure_unique(&state, Some(&input.name), Some(&input.stream_url), None).await?;

    let radio = state.store.insert(&input).await?;

    tracing::info!(radio_id = radio.id, name = %radio.name, "Radio created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: radio })))
}

/// PUT /api/radios/{id}
///
/// Full replacement: all four fields are required.
pub async fn update(
    State(state): State<AppState>,
    RadioId(id): RadioId,
    RadioBody(input): RadioBody<CreateRadio>,
) -> AppResult<impl IntoResponse> {
    let input = input.normalized();
    input.validate().map_err(|e| invalid_fields(&e))?;

    if state.store.find_by_id(id).await?.is_none() {
        return Err(not_found(id));
    }
    ensure_unique(&state, Some(&input.name), Some(&input.stream_url), Some(id)).await?;

    let radio = state
        .store
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(radio_id = id, "Radio updated");

    Ok(Json(DataResponse { data: radio }))
}

/// PATCH /api/radios/{id}
///
/// Partial update: only supplied fields change, and each must be non-empty.
pub async fn patch(
    State(state): State<AppState>,
    RadioId(id): RadioId,
    RadioBody(input): RadioBody<UpdateRadio>,
) -> AppResult<impl IntoResponse> {
    let input = input.normalized();
    if input.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "At least one field must be provided: {}",
            REQUIRED_FIELDS.join(", ")
        ))));
    }
    input.validate().map_err(|e| invalid_fields(&e))?;

    if state.store.find_by_id(id).await?.is_none() {
        return Err(not_found(id));
    }
    ensure_unique(
        &state,
        input.name.as_deref(),
        input.stream_url.as_deref(),
        Some(id),
    )
    .await?;

    let radio = state
        .store
        .patch(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(radio_id = id, "Radio patched");

    Ok(Json(DataResponse { data: radio }))
}

/// DELETE /api/radios/{id}
///
/// Responds with the removed record.
pub async fn delete(
    State(state): State<AppState>,
    RadioId(id): RadioId,
) -> AppResult<impl IntoResponse> {
    let radio = state.store.delete(id).await?.ok_or_else(|| not_found(id))?;

    tracing::info!(radio_id = id, "Radio deleted");

    Ok(Json(DataResponse { data: radio }))
}

// ---------------------------------------------------------------------------
// Duplicate checks
// ---------------------------------------------------------------------------

/// Reject the write if another radio already holds `name` or `stream_url`.
///
/// `exclude_id` is the record being updated, if any. `None` arguments skip
/// that check.
async fn ensure_unique(
    state: &AppState,
    name: Option<&str>,
    stream_url: Option<&str>,
    exclude_id: Option<DbId>,
) -> AppResult<()> {
    let updating = exclude_id.is_some();

    if let (Some(name), Some(mode)) = (name, state.config.name_uniqueness.name_match()) {
        let lookup = RadioLookup::Name { name, mode };
        if let Some(existing) = state.store.find_one(lookup, exclude_id).await? {
            return Err(duplicate(DuplicateField::Name, &existing, updating));
        }
    }

    if let Some(url) = stream_url {
        let lookup = RadioLookup::StreamUrl(url);
        if let Some(existing) = state.store.find_one(lookup, exclude_id).await? {
            return Err(duplicate(DuplicateField::StreamUrl, &existing, updating));
        }
    }

    Ok(())
}

fn duplicate(field: DuplicateField, existing: &Radio, updating: bool) -> AppError {
    tracing::warn!(%field, existing_id = existing.id, "Rejected duplicate radio");
    AppError::Core(CoreError::Duplicate {
        field,
        message: field.message(updating).to_string(),
        existing: existing.summary(),
    })
}
