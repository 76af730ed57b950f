//! Query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for `GET /api/radios`.
///
/// Kept as raw strings so malformed numbers fall back to defaults instead of
/// rejecting the request; see [`radios_core::pagination::PageRequest::from_raw`].
#[derive(Debug, Default, Deserialize)]
pub struct RadioListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub genre: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}
