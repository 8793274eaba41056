//! Shared application state.

use std::sync::Arc;

use augur_core::InferenceService;

/// Handler state: the inference service behind an `Arc` for cheap clones.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InferenceService>,
}

impl AppState {
    pub fn new(service: InferenceService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
