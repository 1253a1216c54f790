//! Value types for a single operation while it is being synthesized.
//!
//! An [`OperationDraft`] is what a handler's documentation parses into. The
//! merge steps in [`crate::synth`] take a draft by value and hand back an
//! augmented one; nothing else mutates it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    /// Field of a JSON request body.
    Json,
    Body,
    Header,
    FormData,
    Cookie,
}

impl Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Json => "json",
            ParameterLocation::Body => "body",
            ParameterLocation::Header => "header",
            ParameterLocation::FormData => "formData",
            ParameterLocation::Cookie => "cookie",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Integer,
    Number,
    Boolean,
    String,
    Array,
    Object,
    File,
}

impl Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParameterType::Integer => "integer",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::String => "string",
            ParameterType::Array => "array",
            ParameterType::Object => "object",
            ParameterType::File => "file",
        };
        write!(f, "{s}")
    }
}

/// Format names attached to inferred path parameters.
pub mod formats {
    pub const FLOAT: &str = "float";
    pub const UUID: &str = "uuid";
}

/// One entry of an operation's `parameters` list.
///
/// Keys other than the ones modelled here (`schema`, `items`, `enum`, ...)
/// are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Empty for `$ref`-only entries.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ParameterLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<ParameterType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location: Some(location),
            ..Self::default()
        }
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// Raw documentation of one operation, before and during synthesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationDraft {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Status code (as a string) to response object.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub responses: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_definitions",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub definitions: BTreeMap<String, Value>,
    #[serde(rename = "requestBody", default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callbacks: Option<Value>,
    /// Remaining operation fields (`operationId`, `consumes`, `deprecated`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OperationDraft {
    /// Read a draft out of a parsed fragment. `null` yields an empty draft.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }
}

/// `definitions` may be authored as a map or as a list of maps.
fn deserialize_definitions<'de, D>(deserializer: D) -> Result<BTreeMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Definitions {
        Map(BTreeMap<String, Value>),
        List(Vec<BTreeMap<String, Value>>),
        Empty(()),
    }

    Ok(match Definitions::deserialize(deserializer)? {
        Definitions::Map(map) => map,
        Definitions::List(list) => list.into_iter().flatten().collect(),
        Definitions::Empty(()) => BTreeMap::new(),
    })
}
