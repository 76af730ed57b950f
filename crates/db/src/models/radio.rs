//! Radio entity model, DTOs, and list query types.

use radios_core::radio::{normalize_field, ExistingRadio, NameMatch, RadioSort};
use radios_core::types::{DbId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `radios` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Radio {
    pub id: DbId,
    pub name: String,
    pub stream_url: String,
    pub image: String,
    pub genre: String,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

impl Radio {
    /// Name and genre, as echoed back when this record blocks a write.
    pub fn summary(&self) -> ExistingRadio {
        ExistingRadio {
            name: self.name.clone(),
            genre: self.genre.clone(),
        }
    }
}

/// DTO for creating a radio, also used by `PUT` for full replacement.
///
/// Missing and `null` fields deserialize to empty strings so they are
/// reported by validation rather than rejected by the deserializer.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateRadio {
    #[serde(default, deserialize_with = "empty_if_null")]
    #[validate(custom(function = "radios_core::radio::validate_not_blank"))]
    pub image: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    #[validate(custom(function = "radios_core::radio::validate_not_blank"))]
    pub name: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    #[validate(custom(function = "radios_core::radio::validate_not_blank"))]
    pub stream_url: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    #[validate(custom(function = "radios_core::radio::validate_not_blank"))]
    pub genre: String,
}

impl CreateRadio {
    /// Copy with surrounding whitespace stripped from every field.
    pub fn normalized(&self) -> Self {
        Self {
            image: normalize_field(&self.image),
            name: normalize_field(&self.name),
            stream_url: normalize_field(&self.stream_url),
            genre: normalize_field(&self.genre),
        }
    }
}

/// DTO for a partial update. Only fields that are present are changed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRadio {
    #[validate(custom(function = "radios_core::radio::validate_not_blank"))]
    pub image: Option<String>,
    #[validate(custom(function = "radios_core::radio::validate_not_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "radios_core::radio::validate_not_blank"))]
    pub stream_url: Option<String>,
    #[validate(custom(function = "radios_core::radio::validate_not_blank"))]
    pub genre: Option<String>,
}

impl UpdateRadio {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.name.is_none() && self.stream_url.is_none() && self.genre.is_none()
    }

    pub fn normalized(&self) -> Self {
        Self {
            image: self.image.as_deref().map(normalize_field),
            name: self.name.as_deref().map(normalize_field),
            stream_url: self.stream_url.as_deref().map(normalize_field),
            genre: self.genre.as_deref().map(normalize_field),
        }
    }
}

fn empty_if_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Row filter shared by listing and counting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RadioFilter {
    /// Exact, case-sensitive genre match.
    pub genre: Option<String>,
    /// Case-insensitive substring of the name, matched literally.
    pub search: Option<String>,
}

impl RadioFilter {
    /// Build a filter, treating empty values as absent.
    pub fn new(genre: Option<String>, search: Option<String>) -> Self {
        Self {
            genre: genre.filter(|g| !g.is_empty()),
            search: search.filter(|s| !s.is_empty()),
        }
    }
}

/// A filtered, sorted, paginated listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioQuery {
    pub filter: RadioFilter,
    pub sort: RadioSort,
    pub skip: i64,
    pub limit: i64,
}

/// Single-record lookup used by the duplicate checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioLookup<'a> {
    Name { name: &'a str, mode: NameMatch },
    StreamUrl(&'a str),
}

impl RadioLookup<'_> {
    pub fn matches(&self, radio: &Radio) -> bool {
        match self {
            RadioLookup::Name { name, mode } => mode.matches(&radio.name, name),
            RadioLookup::StreamUrl(url) => radio.stream_url == *url,
        }
    }
}
