//! Application state shared across handlers. Read-only after startup.

use crate::domain::ApiCredential;
use crate::usecases::AnalysisService;
use std::sync::Arc;

/// 10 MiB, replaced by the router's configured limit.
const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct WebState {
    pub service: Arc<AnalysisService>,
    /// Key from the environment, used when the form field is left empty.
    pub fallback_key: Option<ApiCredential>,
    /// Largest accepted image part.
    pub max_image_bytes: usize,
}

impl WebState {
    pub fn new(service: Arc<AnalysisService>, fallback_key: Option<ApiCredential>) -> Self {
        Self {
            service,
            fallback_key,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    pub fn env_key_loaded(&self) -> bool {
        self.fallback_key.is_some()
    }
}
