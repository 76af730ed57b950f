use crate::radio::{DuplicateField, ExistingRadio};
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Field-level validation failure. `errors` holds one message per field.
    #[error("Validation failed: {message}")]
    InvalidFields { message: String, errors: Vec<String> },

    /// Another radio already holds the name or stream URL being written.
    #[error("Duplicate {field}: {message}")]
    Duplicate {
        field: DuplicateField,
        message: String,
        existing: ExistingRadio,
    },
}
