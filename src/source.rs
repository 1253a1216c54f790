//! Capabilities the synthesizer is built from.
//!
//! [`crate::synth::SpecSynthesizer`] does not know where routes, configuration
//! or handler documentation come from; it is handed implementations of these
//! traits at construction.

use crate::config::SwaggerConfig;
use crate::draft::OperationDraft;
use crate::error::Result;
use crate::route::{Handler, HandlerLookup, Route};
use http::Method;
use std::sync::Arc;

/// Registered routes and their handlers.
pub trait RouteSource: Send + Sync {
    fn routes(&self) -> Vec<Route>;

    /// Locate the handler documenting `verb` on `route`.
    fn handler_for(&self, route: &Route, verb: &Method) -> HandlerLookup;

    /// A view of the routes and their handlers that stays consistent for
    /// one document build, even if the source is reloaded meanwhile.
    fn snapshot(&self) -> Arc<dyn RouteSource>;
}

pub trait ConfigSource: Send + Sync {
    fn swagger_config(&self) -> Arc<SwaggerConfig>;
}

/// Turns a handler's attached documentation into a draft.
pub trait DocstringExtractor: Send + Sync {
    fn extract(&self, route: &Route, verb: &Method, handler: &Handler) -> Result<OperationDraft>;
}

/// Default success status for a verb when the route declares none.
pub trait StatusCodeResolver: Send + Sync {
    fn status_code(&self, verb: &Method) -> u16;
}

pub trait TagResolver: Send + Sync {
    fn tags(&self, route: &Route, verb: &Method) -> Vec<String>;
}

/// `POST` creates (`201`), everything else is `200`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStatusCodes;

impl StatusCodeResolver for DefaultStatusCodes {
    fn status_code(&self, verb: &Method) -> u16 {
        if *verb == Method::POST {
            201
        } else {
            200
        }
    }
}

/// Tags a route with the first static segment of its rule.
///
/// `/users/<int:id>` is tagged `users`; `/` and `/<id>` get no tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentTagResolver;

impl TagResolver for SegmentTagResolver {
    fn tags(&self, route: &Route, _verb: &Method) -> Vec<String> {
        route
            .rule
            .split('/')
            .find(|s| !s.is_empty())
            .filter(|s| !s.starts_with('<'))
            .map(|s| vec![s.to_string()])
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoTags;

impl TagResolver for NoTags {
    fn tags(&self, _route: &Route, _verb: &Method) -> Vec<String> {
        Vec::new()
    }
}

/// A configuration fixed for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig(Arc<SwaggerConfig>);

impl StaticConfig {
    pub fn new(config: SwaggerConfig) -> Self {
        Self(Arc::new(config))
    }
}

impl ConfigSource for StaticConfig {
    fn swagger_config(&self) -> Arc<SwaggerConfig> {
        Arc::clone(&self.0)
    }
}

impl<T: RouteSource + ?Sized> RouteSource for Arc<T> {
    fn routes(&self) -> Vec<Route> {
        (**self).routes()
    }

    fn handler_for(&self, route: &Route, verb: &Method) -> HandlerLookup {
        (**self).handler_for(route, verb)
    }

    fn snapshot(&self) -> Arc<dyn RouteSource> {
        (**self).snapshot()
    }
}
