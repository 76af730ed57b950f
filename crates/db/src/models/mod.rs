//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts and full replacement
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod radio;
