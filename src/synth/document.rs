use super::definitions::{fold_definitions, IdScope};
use super::{normalize_path, render_operation, SpecSynthesizer};
use crate::config::{SpecEntry, SwaggerConfig};
use crate::error::{Result, SwaggerError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::info;

const DEFAULT_VERSION: &str = "0.0.1";
const DEFAULT_TITLE: &str = "A swagger API";
const DEFAULT_DESCRIPTION: &str = "powered by Pyrin";
const DEFAULT_TERMS: &str = "/tos";
const DEFAULT_SWAGGER: &str = "2.0";

/// OpenAPI 3 top-level fields copied from configuration.
const OAS3_FIELDS: [&str; 4] = ["servers", "components", "externalDocs", "tags"];

/// A synthesized API document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swagger: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,
    pub info: Value,
    /// Path template to lowercase verb to operation.
    #[serde(default)]
    pub paths: BTreeMap<String, Map<String, Value>>,
    #[serde(default)]
    pub definitions: Map<String, Value>,
    /// `host`, `basePath`, `schemes`, `securityDefinitions`, extensions.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiDocument {
    pub fn operation(&self, path: &str, verb: &str) -> Option<&Value> {
        self.paths.get(path).and_then(|ops| ops.get(verb))
    }

    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

fn info_for(config: &SwaggerConfig, spec: &SpecEntry) -> Value {
    if let Some(info) = &config.info {
        return info.clone();
    }
    let pick = |own: &Option<String>, global: &Option<String>, default: &str| {
        own.clone()
            .or_else(|| global.clone())
            .unwrap_or_else(|| default.to_string())
    };
    json!({
        "version": pick(&spec.version, &config.version, DEFAULT_VERSION),
        "title": pick(&spec.title, &config.title, DEFAULT_TITLE),
        "description": pick(&spec.description, &config.description, DEFAULT_DESCRIPTION),
        "termsOfService": pick(&spec.terms_of_service, &config.terms_of_service, DEFAULT_TERMS),
    })
}

fn document_skeleton(config: &SwaggerConfig, spec: &SpecEntry) -> ApiDocument {
    let mut doc = ApiDocument {
        swagger: None,
        openapi: None,
        info: info_for(config, spec),
        paths: BTreeMap::new(),
        definitions: config.definitions.clone(),
        extra: Map::new(),
    };

    match &config.openapi {
        Some(version) => doc.openapi = Some(version.clone()),
        None => {
            doc.swagger = Some(
                config
                    .swagger
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SWAGGER.to_string()),
            )
        }
    }

    if let Some(host) = &config.host {
        doc.extra.insert("host".to_string(), Value::String(host.clone()));
    }
    if let Some(base_path) = &config.base_path {
        doc.extra.insert("basePath".to_string(), Value::String(base_path.clone()));
    }
    if let Some(schemes) = &config.schemes {
        doc.extra.insert("schemes".to_string(), Value::from(schemes.clone()));
    }
    if !config.security_definitions.is_empty() {
        doc.extra.insert(
            "securityDefinitions".to_string(),
            Value::Object(config.security_definitions.clone()),
        );
    }

    let is_oas3 = config
        .openapi
        .as_deref()
        .is_some_and(|v| v.split('.').next() == Some("3"));
    for (key, value) in &config.extra {
        if key.starts_with("x-") || (is_oas3 && OAS3_FIELDS.contains(&key.as_str())) {
            doc.extra.insert(key.clone(), value.clone());
        }
    }

    for (path, operations) in &config.paths {
        if let Value::Object(operations) = operations {
            doc.paths.insert(path.clone(), operations.clone());
        }
    }
    doc
}

/// Fold `operations` into a path item. An operation already present for the
/// same verb (seeded from config or from an earlier route) is updated key by
/// key, so fields the new operation does not set are kept.
fn merge_operations(item: &mut Map<String, Value>, operations: Map<String, Value>) {
    for (verb, operation) in operations {
        match (item.get_mut(&verb), operation) {
            (Some(Value::Object(existing)), Value::Object(fields)) => existing.extend(fields),
            (_, operation) => {
                item.insert(verb, operation);
            }
        }
    }
}

impl SpecSynthesizer {
    /// Assemble the document published under `endpoint`.
    ///
    /// All-or-nothing: any failure aborts the build.
    pub fn build_document(&self, endpoint: &str) -> Result<ApiDocument> {
        let config = self.config();
        let spec = config
            .spec(endpoint)
            .ok_or_else(|| SwaggerError::UnknownEndpoint(endpoint.to_string()))?;

        let mut doc = document_skeleton(&config, spec);
        let collected = self.collect_operations(&config, spec)?;
        let mut operation_count = 0;

        for entry in collected {
            let path = normalize_path(
                &entry.route.rule,
                config.swagger_ui_prefix.as_deref(),
                config.base_path.as_deref(),
            );
            let mut operations = Map::new();
            for (verb, draft) in entry.operations {
                let scope = if config.prefix_ids {
                    IdScope::prefixed(&entry.route.endpoint, verb.as_str())
                } else {
                    IdScope::plain()
                };
                let draft = fold_definitions(draft, &scope, &mut doc.definitions);
                operations.insert(verb.as_str().to_lowercase(), render_operation(&draft));
                operation_count += 1;
            }
            merge_operations(doc.paths.entry(path).or_default(), operations);
        }

        info!(
            endpoint,
            paths = doc.paths.len(),
            operations = operation_count,
            definitions = doc.definitions.len(),
            "api document built"
        );
        Ok(doc)
    }
}
