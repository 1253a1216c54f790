use crate::cache::DocumentCache;
use crate::error::Result;
use crate::synth::{ApiDocument, SpecSynthesizer};
use std::sync::Arc;
use tracing::info;

/// Serves synthesized documents, memoized per endpoint.
#[derive(Debug)]
pub struct DocumentService {
    synthesizer: SpecSynthesizer,
    cache: DocumentCache<ApiDocument>,
}

impl DocumentService {
    pub fn new(synthesizer: SpecSynthesizer, live_reload: bool) -> Self {
        Self {
            synthesizer,
            cache: DocumentCache::new(live_reload),
        }
    }

    /// Live reload follows the configuration of the synthesizer.
    pub fn from_config(synthesizer: SpecSynthesizer) -> Self {
        let live_reload = synthesizer.config().live_reload;
        Self::new(synthesizer, live_reload)
    }

    /// The document published under `endpoint`.
    pub fn get_apispecs(&self, endpoint: &str) -> Result<Arc<ApiDocument>> {
        self.cache.get_or_build(endpoint, || {
            info!(endpoint, live_reload = self.cache.is_live_reload(), "building api document");
            self.synthesizer.build_document(endpoint)
        })
    }

    pub fn synthesizer(&self) -> &SpecSynthesizer {
        &self.synthesizer
    }

    pub fn cache(&self) -> &DocumentCache<ApiDocument> {
        &self.cache
    }
}
