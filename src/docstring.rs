//! Handler documentation parsing.
//!
//! A handler docstring reads like this:
//!
//! ```text
//! Get a user.
//!
//! Looks the user up by its numeric id.
//! ---
//! responses:
//!   404:
//!     description: no such user
//! ```
//!
//! The first line becomes the summary, everything up to `---` the
//! description, and the YAML after `---` the operation fragment. Fragments
//! from [`Handler::specs`], the docstring and an optional file under
//! `doc_dir` are merged in that order. A summary or description written as
//! docstring prose replaces one set in any fragment.

use crate::draft::OperationDraft;
use crate::error::{Result, SwaggerError};
use crate::route::{Handler, Route, ViewKind};
use crate::source::DocstringExtractor;
use http::Method;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

const YAML_SEPARATOR: &str = "---";

/// A docstring split into its parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocstring {
    pub summary: Option<String>,
    pub description: Option<String>,
    /// Text after the `---` separator, if any.
    pub yaml: Option<String>,
}

/// Split a docstring into summary, description and YAML section.
pub fn parse_docstring(doc: &str) -> ParsedDocstring {
    let doc = dedent(doc);
    let (prose, yaml) = match find_separator(&doc) {
        Some((start, end)) => (&doc[..start], Some(doc[end..].to_string())),
        None => (doc.as_str(), None),
    };

    let prose = prose.trim();
    let (first, rest) = match prose.split_once('\n') {
        Some((first, rest)) => (first.trim(), rest.trim()),
        None => (prose, ""),
    };

    ParsedDocstring {
        summary: non_empty(first),
        description: non_empty(rest),
        yaml: yaml.filter(|y| !y.trim().is_empty()),
    }
}

/// Byte range of the first line consisting only of `---`.
fn find_separator(doc: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for line in doc.split_inclusive('\n') {
        if line.trim_end() == YAML_SEPARATOR {
            return Some((offset, offset + line.len()));
        }
        offset += line.len();
    }
    None
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Strip the first line and remove the indentation common to the others.
///
/// Only ASCII spaces and tabs count as indentation.
fn dedent(doc: &str) -> String {
    let mut lines = doc.lines();
    let first = lines.next().unwrap_or("").trim();
    let rest: Vec<&str> = lines.collect();
    let indent = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.bytes().take_while(|b| *b == b' ' || *b == b'\t').count())
        .min()
        .unwrap_or(0);

    let mut out = String::from(first);
    for line in rest {
        out.push('\n');
        match line.get(indent..) {
            Some(stripped) => out.push_str(stripped.trim_end()),
            None => out.push_str(line.trim()),
        }
    }
    out.trim_matches('\n').to_string()
}

/// Convert parsed YAML into JSON. Non-string mapping keys such as `200` become strings.
pub fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;
    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(map) => {
            let mut out = Map::new();
            for (k, v) in map {
                out.insert(yaml_key(k), yaml_to_json(v));
            }
            Value::Object(out)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value as Yaml;
    match key {
        Yaml::String(s) => s,
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Deep-merge `source` into `target`: maps recurse, lists extend, anything else is replaced.
pub fn merge_specs(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(dst), Value::Object(src)) => {
            for (key, value) in src {
                match dst.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_specs(existing, value)
                    }
                    Some(Value::Array(existing)) if value.is_array() => {
                        if let Value::Array(items) = value {
                            existing.extend(items);
                        }
                    }
                    _ => {
                        dst.insert(key, value);
                    }
                }
            }
        }
        (dst, src) => *dst = src,
    }
}

/// Reads docstrings, attached fragments and `doc_dir` files.
#[derive(Debug, Clone, Default)]
pub struct YamlDocstringExtractor {
    doc_dir: Option<PathBuf>,
}

impl YamlDocstringExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doc_dir(doc_dir: impl Into<PathBuf>) -> Self {
        Self {
            doc_dir: Some(doc_dir.into()),
        }
    }

    /// `<doc_dir>/<handler>.yml`, or `<doc_dir>/<handler>/<verb>.yml` for method views.
    fn doc_file(&self, handler: &Handler, verb: &Method) -> Option<PathBuf> {
        let dir = self.doc_dir.as_deref()?;
        let path = match handler.view {
            ViewKind::Function => dir.join(format!("{}.yml", handler.name)),
            ViewKind::MethodView => dir
                .join(&handler.name)
                .join(format!("{}.yml", verb.as_str().to_lowercase())),
        };
        path.is_file().then_some(path)
    }

    fn parse_yaml(&self, route: &Route, verb: &Method, text: &str) -> Result<Value> {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|source| SwaggerError::Docstring {
                endpoint: route.endpoint.clone(),
                verb: verb.to_string(),
                source,
            })?;
        Ok(yaml_to_json(yaml))
    }

    fn read_doc_file(&self, route: &Route, verb: &Method, path: &Path) -> Result<Value> {
        let text = std::fs::read_to_string(path).map_err(|source| SwaggerError::DocFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), endpoint = %route.endpoint, "loaded doc file");
        self.parse_yaml(route, verb, &text)
    }
}

impl DocstringExtractor for YamlDocstringExtractor {
    fn extract(&self, route: &Route, verb: &Method, handler: &Handler) -> Result<OperationDraft> {
        let mut fragment = Value::Object(Map::new());
        let mut parsed = ParsedDocstring::default();

        if let Some(specs) = &handler.specs {
            merge_specs(&mut fragment, specs.clone());
        }
        if let Some(doc) = &handler.docstring {
            parsed = parse_docstring(doc);
            if let Some(yaml) = &parsed.yaml {
                merge_specs(&mut fragment, self.parse_yaml(route, verb, yaml)?);
            }
        }
        if let Some(path) = self.doc_file(handler, verb) {
            merge_specs(&mut fragment, self.read_doc_file(route, verb, &path)?);
        }

        let mut fragment = lift_verb_section(fragment, verb);
        if let Value::Object(obj) = &mut fragment {
            if let Some(summary) = parsed.summary {
                obj.insert("summary".to_string(), Value::String(summary));
            }
            if let Some(description) = parsed.description {
                obj.insert("description".to_string(), Value::String(description));
            }
        }

        OperationDraft::from_value(fragment).map_err(|source| SwaggerError::Fragment {
            endpoint: route.endpoint.clone(),
            verb: verb.to_string(),
            source,
        })
    }
}

const VERB_KEYS: [&str; 7] = ["get", "post", "put", "patch", "delete", "head", "options"];

/// A fragment shared by several verbs may hold per-verb sections (`get:`,
/// `post:`, ...); keep the common part and merge this verb's section over it.
fn lift_verb_section(fragment: Value, verb: &Method) -> Value {
    let Value::Object(mut obj) = fragment else {
        return fragment;
    };
    let has_sections = VERB_KEYS
        .iter()
        .any(|k| obj.get(*k).is_some_and(Value::is_object));
    if !has_sections {
        return Value::Object(obj);
    }

    let wanted = verb.as_str().to_lowercase();
    let section = obj.remove(&wanted);
    obj.retain(|k, v| !(VERB_KEYS.contains(&k.as_str()) && v.is_object()));
    let mut merged = Value::Object(obj);
    if let Some(section) = section {
        merge_specs(&mut merged, section);
    }
    merged
}
