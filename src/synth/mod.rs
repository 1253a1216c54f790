//! # Document synthesis
//!
//! [`SpecSynthesizer`] walks the registered routes, asks the extractor for
//! each verb's draft, runs the draft through the metadata steps below and
//! assembles everything into an [`ApiDocument`].
//!
//! ## Metadata steps
//!
//! Applied to every draft in this order:
//!
//! 1. required parameters (path arguments and declared required names)
//! 2. optional parameters
//! 3. paging parameters
//! 4. locale and timezone parameters
//! 5. security requirements
//! 6. `401` response
//! 7. `403` response
//! 8. success response
//! 9. tags
//!
//! Required parameters are settled first so a name already required is never
//! later marked optional.

pub mod assembler;
pub mod definitions;
pub mod document;
pub mod parameters;
pub mod path;
pub mod responses;

pub use assembler::{render_operation, CollectedRoute};
pub use document::ApiDocument;
pub use path::normalize_path;

use crate::config::SwaggerConfig;
use crate::draft::OperationDraft;
use crate::route::Route;
use crate::source::{
    ConfigSource, DefaultStatusCodes, DocstringExtractor, RouteSource, SegmentTagResolver,
    StatusCodeResolver, TagResolver,
};
use http::Method;
use std::sync::Arc;

use parameters::{
    inject_locale_and_timezone, inject_paging_parameters, reconcile_optional_parameters,
    reconcile_required_parameters,
};
use responses::{
    inject_auth_failure_response, inject_permission_denied_response, inject_security_requirements,
    inject_success_response, inject_tags,
};

/// Builds API documents from a route source, a configuration and an extractor.
#[derive(Clone)]
pub struct SpecSynthesizer {
    routes: Arc<dyn RouteSource>,
    config: Arc<dyn ConfigSource>,
    extractor: Arc<dyn DocstringExtractor>,
    status_codes: Arc<dyn StatusCodeResolver>,
    tags: Arc<dyn TagResolver>,
}

impl SpecSynthesizer {
    /// Uses [`DefaultStatusCodes`] and [`SegmentTagResolver`] until replaced.
    pub fn new(
        routes: Arc<dyn RouteSource>,
        config: Arc<dyn ConfigSource>,
        extractor: Arc<dyn DocstringExtractor>,
    ) -> Self {
        Self {
            routes,
            config,
            extractor,
            status_codes: Arc::new(DefaultStatusCodes),
            tags: Arc::new(SegmentTagResolver),
        }
    }

    pub fn with_status_resolver(mut self, resolver: Arc<dyn StatusCodeResolver>) -> Self {
        self.status_codes = resolver;
        self
    }

    pub fn with_tag_resolver(mut self, resolver: Arc<dyn TagResolver>) -> Self {
        self.tags = resolver;
        self
    }

    pub fn config(&self) -> Arc<SwaggerConfig> {
        self.config.swagger_config()
    }

    /// Fill in everything the route implies but the draft does not document.
    pub fn fix_metadata(
        &self,
        config: &SwaggerConfig,
        route: &Route,
        verb: &Method,
        draft: OperationDraft,
    ) -> OperationDraft {
        let draft = reconcile_required_parameters(route, verb, draft);
        let draft = reconcile_optional_parameters(route, verb, draft);
        let draft = inject_paging_parameters(route, &config.paging, draft);
        let draft = inject_locale_and_timezone(&config.request, draft);
        let draft = inject_security_requirements(route, &config.security_scheme_names(), draft);
        let draft = inject_auth_failure_response(route, draft);
        let draft = inject_permission_denied_response(route, draft);
        let draft = inject_success_response(route, verb, self.status_codes.as_ref(), draft);
        inject_tags(route, verb, self.tags.as_ref(), draft)
    }
}

impl std::fmt::Debug for SpecSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecSynthesizer").finish_non_exhaustive()
    }
}
