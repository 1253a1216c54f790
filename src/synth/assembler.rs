use super::SpecSynthesizer;
use crate::config::{SpecEntry, SwaggerConfig};
use crate::draft::OperationDraft;
use crate::error::{Result, SwaggerError};
use crate::route::{HandlerLookup, Route};
use crate::source::RouteSource;
use http::Method;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Operation fields copied from the draft after the fixed ones.
pub const OPTIONAL_FIELDS: [&str; 8] = [
    "tags",
    "consumes",
    "produces",
    "schemes",
    "security",
    "deprecated",
    "operationId",
    "externalDocs",
];

/// A documented route with one fixed-up draft per verb.
#[derive(Debug, Clone)]
pub struct CollectedRoute {
    pub route: Route,
    pub operations: Vec<(Method, OperationDraft)>,
}

impl SpecSynthesizer {
    /// Extract and fix up the draft of every documented route and verb.
    ///
    /// Routes and handlers are read from a single [`RouteSource::snapshot`],
    /// so a concurrent reload cannot pair a route with another table.
    /// Fails on the first verb without a handler, unless the route's view
    /// declares no methods at all.
    pub fn collect_operations(&self, config: &SwaggerConfig, spec: &SpecEntry) -> Result<Vec<CollectedRoute>> {
        let mut collected = Vec::new();
        let routes = self.routes.snapshot();

        for route in routes.routes() {
            if !config.endpoint.is_empty() && route.endpoint.starts_with(&config.endpoint) {
                debug!(endpoint = %route.endpoint, "skipping documentation route");
                continue;
            }
            if !spec.accepts_rule(&route.rule) {
                continue;
            }

            let mut operations = Vec::new();
            for verb in &route.methods {
                if config.is_ignored(verb) {
                    continue;
                }
                let handler = match routes.handler_for(&route, verb) {
                    HandlerLookup::Found(handler) => handler,
                    HandlerLookup::EmptyView => {
                        warn!(rule = %route.rule, %verb, "view declares no methods, skipping");
                        continue;
                    }
                    HandlerLookup::Missing => {
                        return Err(SwaggerError::MissingHandler {
                            rule: route.rule.clone(),
                            verb: verb.to_string(),
                        })
                    }
                };

                debug!(rule = %route.rule, %verb, handler = %handler.name, "documenting operation");
                let draft = self.extractor.extract(&route, verb, &handler)?;
                let draft = self.fix_metadata(config, &route, verb, draft);
                operations.push((verb.clone(), draft));
            }

            if !operations.is_empty() {
                collected.push(CollectedRoute { route, operations });
            }
        }
        Ok(collected)
    }
}

/// Render a fixed-up draft as the operation object written under `paths`.
pub fn render_operation(draft: &OperationDraft) -> Value {
    let mut operation = Map::new();

    if let Some(summary) = draft.summary.as_ref().filter(|s| !s.is_empty()) {
        operation.insert("summary".to_string(), Value::String(summary.clone()));
    }
    if let Some(description) = draft.description.as_ref().filter(|s| !s.is_empty()) {
        operation.insert("description".to_string(), Value::String(description.clone()));
    }
    if let Some(body) = &draft.request_body {
        operation.insert("requestBody".to_string(), body.clone());
    }
    if let Some(callbacks) = &draft.callbacks {
        operation.insert("callbacks".to_string(), callbacks.clone());
    }

    let responses: Map<String, Value> = draft
        .responses
        .iter()
        .map(|(code, response)| (code.clone(), response.clone()))
        .collect();
    operation.insert("responses".to_string(), Value::Object(responses));

    if !draft.parameters.is_empty() {
        operation.insert(
            "parameters".to_string(),
            serde_json::to_value(&draft.parameters).unwrap_or(Value::Array(Vec::new())),
        );
    }

    for field in OPTIONAL_FIELDS {
        let value = match field {
            "tags" if !draft.tags.is_empty() => Value::from(draft.tags.clone()),
            "security" if !draft.security.is_empty() => {
                serde_json::to_value(&draft.security).unwrap_or(Value::Array(Vec::new()))
            }
            "tags" | "security" => continue,
            "consumes" | "produces" => match draft.extra.get(field) {
                Some(Value::Array(list)) => Value::Array(list.clone()),
                Some(single) => Value::Array(vec![single.clone()]),
                None => continue,
            },
            _ => match draft.extra.get(field) {
                Some(value) => value.clone(),
                None => continue,
            },
        };
        operation.insert(field.to_string(), value);
    }

    for (key, value) in &draft.extra {
        if key.starts_with("x-") {
            operation.insert(key.clone(), value.clone());
        }
    }

    Value::Object(operation)
}
