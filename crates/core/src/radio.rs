//! Field rules, uniqueness policy, and sort parsing for radio records.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Required fields
// ---------------------------------------------------------------------------

/// The four fields every radio must carry, in the order they are reported.
pub const REQUIRED_FIELDS: [&str; 4] = ["image", "name", "stream_url", "genre"];

/// Top-level message returned when any required field is missing or blank.
pub const MISSING_FIELDS_MESSAGE: &str =
    "All fields are required: image, name, stream_url, genre";

/// Reject empty and whitespace-only values.
///
/// Used as a `validator` custom rule on the radio DTOs.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("is required")));
    }
    Ok(())
}

/// Flatten `validator` output into one `"<field> <message>"` entry per error.
///
/// Entries follow [`REQUIRED_FIELDS`] order so responses are deterministic;
/// any field outside that list is appended alphabetically.
pub fn collect_field_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| {
        let rank = REQUIRED_FIELDS
            .iter()
            .position(|f| *f == &**field)
            .unwrap_or(REQUIRED_FIELDS.len());
        (rank, field.to_string())
    });

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let message = err.message.as_deref().unwrap_or("is invalid");
                format!("{field} {message}")
            })
        })
        .collect()
}

/// Convert `validator` output into the domain error.
pub fn invalid_fields(errors: &ValidationErrors) -> CoreError {
    CoreError::InvalidFields {
        message: MISSING_FIELDS_MESSAGE.to_string(),
        errors: collect_field_errors(errors),
    }
}

/// Trim surrounding whitespace from a submitted field value.
pub fn normalize_field(value: &str) -> String {
    value.trim().to_string()
}

// ---------------------------------------------------------------------------
// Name uniqueness
// ---------------------------------------------------------------------------

/// How two radio names are compared when checking for duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    CaseInsensitive,
    Exact,
}

impl NameMatch {
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            NameMatch::CaseInsensitive => a.to_lowercase() == b.to_lowercase(),
            NameMatch::Exact => a == b,
        }
    }
}

/// Deployment policy for radio name uniqueness.
///
/// Parsed from `RADIO_NAME_UNIQUENESS`: `case_insensitive` (default),
/// `exact`, or `off`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameUniqueness {
    #[default]
    CaseInsensitive,
    Exact,
    Off,
}

impl NameUniqueness {
    /// The comparison to use for the duplicate pre-check, or `None` when
    /// names are not required to be unique.
    pub fn name_match(self) -> Option<NameMatch> {
        match self {
            NameUniqueness::CaseInsensitive => Some(NameMatch::CaseInsensitive),
            NameUniqueness::Exact => Some(NameMatch::Exact),
            NameUniqueness::Off => None,
        }
    }
}

impl FromStr for NameUniqueness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "case_insensitive" | "insensitive" => Ok(NameUniqueness::CaseInsensitive),
            "exact" | "case_sensitive" => Ok(NameUniqueness::Exact),
            "off" | "none" | "disabled" => Ok(NameUniqueness::Off),
            other => Err(format!(
                "unknown name uniqueness policy '{other}' (expected case_insensitive, exact, or off)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Duplicates
// ---------------------------------------------------------------------------

/// Which unique field a write collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Name,
    StreamUrl,
}

impl DuplicateField {
    pub fn as_str(self) -> &'static str {
        match self {
            DuplicateField::Name => "name",
            DuplicateField::StreamUrl => "stream_url",
        }
    }

    /// Message for a collision. `other` is true when updating an existing
    /// record, where the holder is necessarily a different radio.
    pub fn message(self, other: bool) -> &'static str {
        match (self, other) {
            (DuplicateField::Name, false) => "A radio with this name already exists",
            (DuplicateField::Name, true) => "Another radio already uses this name",
            (DuplicateField::StreamUrl, false) => "A radio with this stream URL already exists",
            (DuplicateField::StreamUrl, true) => "Another radio already uses this stream URL",
        }
    }
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The part of a conflicting record echoed back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExistingRadio {
    pub name: String,
    pub genre: String,
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Columns a radio listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Genre,
    StreamUrl,
    Image,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Database column name. Only ever one of a fixed set of identifiers,
    /// so it is safe to interpolate into `ORDER BY`.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Genre => "genre",
            SortField::StreamUrl => "stream_url",
            SortField::Image => "image",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" | "_id" => Ok(SortField::Id),
            "name" => Ok(SortField::Name),
            "genre" => Ok(SortField::Genre),
            "stream_url" => Ok(SortField::StreamUrl),
            "image" => Ok(SortField::Image),
            "created_at" | "createdAt" => Ok(SortField::CreatedAt),
            "updated_at" | "updatedAt" => Ok(SortField::UpdatedAt),
            other => Err(CoreError::Validation(format!(
                "Cannot sort by '{other}'. Allowed: name, genre, stream_url, image, id, createdAt, updatedAt"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A parsed `sort` query parameter: a field, optionally prefixed with `-`
/// for descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for RadioSort {
    fn default() -> Self {
        Self {
            field: SortField::Name,
            order: SortOrder::Asc,
        }
    }
}

impl RadioSort {
    /// Parse a user-supplied sort value. Blank input yields the default.
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        let Some(raw) = raw else {
            return Ok(Self::default());
        };

        let (order, name) = match raw.strip_prefix('-') {
            Some(rest) => (SortOrder::Desc, rest),
            None => (SortOrder::Asc, raw.strip_prefix('+').unwrap_or(raw)),
        };

        Ok(Self {
            field: name.parse()?,
            order,
        })
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Escape `LIKE` metacharacters so user input matches literally.
///
/// The result is intended for `ILIKE '%' || $1 || '%' ESCAPE '\'`.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Case-insensitive substring test matching the `ILIKE` search semantics.
pub fn name_contains(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(&needle.to_lowercase())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
