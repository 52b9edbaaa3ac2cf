use std::sync::Arc;

use crate::ai::ResponseGenerator;
use crate::store::ReviewStore;

/// Shared by every worker; holds no per-request mutable state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReviewStore>,
    pub generator: ResponseGenerator,
}

impl AppState {
    pub fn new(store: Arc<dyn ReviewStore>, generator: ResponseGenerator) -> Self {
        Self { store, generator }
    }
}
