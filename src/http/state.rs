//! Application state for the HTTP server.

use std::sync::Arc;

use crate::engine::TimetableEngine;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Engine facade backing every endpoint
    pub engine: Arc<TimetableEngine>,
}

impl AppState {
    /// Create a new application state with the given engine.
    pub fn new(engine: Arc<TimetableEngine>) -> Self {
        Self { engine }
    }
}
