use std::sync::Arc;

use radios_db::store::SharedStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Record store, opened once at startup.
    pub store: SharedStore,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
