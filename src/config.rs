//! Documentation configuration.
//!
//! Every field has a default, so an empty file is a valid configuration that
//! serves one document at `/swagger.json`.

use anyhow::Context;
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// One published document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecEntry {
    /// Identifier used to request and cache the document.
    pub endpoint: String,
    /// URL the document is served at.
    pub route: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "termsOfService", default, skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    /// Only rules starting with one of these prefixes are documented. Empty keeps all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_filter: Vec<String>,
}

impl SpecEntry {
    pub fn new(endpoint: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            route: route.into(),
            title: None,
            version: None,
            description: None,
            terms_of_service: None,
            rule_filter: Vec::new(),
        }
    }

    pub fn accepts_rule(&self, rule: &str) -> bool {
        self.rule_filter.is_empty() || self.rule_filter.iter().any(|p| rule.starts_with(p.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub page: String,
    pub page_size: String,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page: "page".to_string(),
            page_size: "page_size".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub locale_param: String,
    pub timezone_param: String,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            locale_param: "locale".to_string(),
            timezone_param: "timezone".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwaggerConfig {
    /// Endpoint prefix of the documentation routes; matching routes are never documented.
    pub endpoint: String,
    pub specs: Vec<SpecEntry>,
    #[serde(rename = "securityDefinitions")]
    pub security_definitions: Map<String, Value>,
    pub ignore_verbs: Vec<String>,
    #[serde(rename = "basePath", skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    /// Reverse-proxy prefix prepended to every rule.
    #[serde(rename = "swaggerUiPrefix", skip_serializing_if = "Option::is_none")]
    pub swagger_ui_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openapi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swagger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "termsOfService", skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    pub definitions: Map<String, Value>,
    pub paths: Map<String, Value>,
    /// Prefix folded definition ids with `<endpoint>_<verb>_`.
    pub prefix_ids: bool,
    /// Directory holding per-handler YAML documentation files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_dir: Option<PathBuf>,
    /// URL of the Swagger UI page.
    pub specs_route: String,
    pub paging: PagingConfig,
    pub request: RequestConfig,
    /// Rebuild documents on every request.
    pub live_reload: bool,
    /// Remaining top-level keys; `x-` vendor extensions and OAS3 fields live here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for SwaggerConfig {
    fn default() -> Self {
        Self {
            endpoint: "swagger".to_string(),
            specs: vec![SpecEntry::new("swagger", "/swagger.json")],
            security_definitions: Map::new(),
            ignore_verbs: vec!["HEAD".to_string(), "OPTIONS".to_string()],
            base_path: None,
            swagger_ui_prefix: None,
            host: None,
            schemes: None,
            openapi: None,
            swagger: None,
            info: None,
            title: None,
            version: None,
            description: None,
            terms_of_service: None,
            definitions: Map::new(),
            paths: Map::new(),
            prefix_ids: false,
            doc_dir: None,
            specs_route: "/swagger/".to_string(),
            paging: PagingConfig::default(),
            request: RequestConfig::default(),
            live_reload: false,
            extra: Map::new(),
        }
    }
}

impl SwaggerConfig {
    pub fn spec(&self, endpoint: &str) -> Option<&SpecEntry> {
        self.specs.iter().find(|s| s.endpoint == endpoint)
    }

    /// Names of the configured security schemes, sorted.
    pub fn security_scheme_names(&self) -> Vec<String> {
        self.security_definitions.keys().cloned().collect()
    }

    pub fn is_ignored(&self, verb: &Method) -> bool {
        self.ignore_verbs
            .iter()
            .any(|v| v.eq_ignore_ascii_case(verb.as_str()))
    }
}

/// Parse a configuration from YAML or JSON text.
pub fn parse_config(content: &str, is_yaml: bool) -> anyhow::Result<SwaggerConfig> {
    if content.trim().is_empty() {
        return Ok(SwaggerConfig::default());
    }
    let config = if is_yaml {
        serde_yaml::from_str(content).context("swagger config is not valid YAML")?
    } else {
        serde_json::from_str(content).context("swagger config is not valid JSON")?
    };
    Ok(config)
}

/// Load a configuration file, picking the format from its extension.
pub fn load_config(file_path: impl AsRef<Path>) -> anyhow::Result<SwaggerConfig> {
    let path = file_path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read swagger config {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    parse_config(&content, is_yaml).with_context(|| format!("failed to load {}", path.display()))
}
