//! Domain rules for the radio station catalogue.
//!
//! Everything here is free of I/O so it can be shared by the store and the
//! HTTP layer.

pub mod error;
pub mod pagination;
pub mod radio;
pub mod types;
