use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

use super::rule::parse_placeholders;

/// Declared type of a path argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentType {
    Integer,
    Float,
    String,
    Uuid,
    /// Custom converters; documented without a type.
    Other,
}

impl ArgumentType {
    /// Map a rule converter name to the argument type it produces.
    pub fn from_converter(converter: Option<&str>) -> Self {
        match converter {
            None | Some("") | Some("default") | Some("string") | Some("path") => {
                ArgumentType::String
            }
            Some("int") => ArgumentType::Integer,
            Some("float") => ArgumentType::Float,
            Some("uuid") => ArgumentType::Uuid,
            Some(_) => ArgumentType::Other,
        }
    }
}

impl std::fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ArgumentType::Integer => "Integer",
            ArgumentType::Float => "Float",
            ArgumentType::String => "String",
            ArgumentType::Uuid => "Uuid",
            ArgumentType::Other => "Other",
        };
        write!(f, "{}", s)
    }
}

/// A registered route as seen by the document synthesizer.
#[derive(Debug, Clone)]
pub struct Route {
    pub endpoint: String,
    /// Native URL pattern, e.g. `/users/<int:id>`.
    pub rule: String,
    pub methods: Vec<Method>,
    /// Path arguments in rule order.
    pub arguments: Vec<(String, ArgumentType)>,
    /// Extra names that must be sent with every request.
    pub required_arguments: BTreeSet<String>,
    pub is_paged: bool,
    pub is_protected: bool,
    pub permissions: Vec<String>,
    pub status_code: Option<u16>,
}

impl Route {
    /// Build a public, unpaged route; path arguments are read from `rule`.
    pub fn new<I>(endpoint: impl Into<String>, rule: impl Into<String>, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        let rule = rule.into();
        let arguments = parse_placeholders(&rule)
            .into_iter()
            .map(|p| {
                let ty = p.argument_type();
                (p.name, ty)
            })
            .collect();
        let mut unique: Vec<Method> = Vec::new();
        for m in methods {
            if !unique.contains(&m) {
                unique.push(m);
            }
        }
        Self {
            endpoint: endpoint.into(),
            rule,
            methods: unique,
            arguments,
            required_arguments: BTreeSet::new(),
            is_paged: false,
            is_protected: false,
            permissions: Vec::new(),
            status_code: None,
        }
    }

    /// Mark the route as protected, optionally requiring permissions.
    pub fn protected<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.is_protected = true;
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn paged(mut self) -> Self {
        self.is_paged = true;
        self
    }

    pub fn with_status_code(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn with_required_arguments<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_arguments.extend(names.into_iter().map(Into::into));
        self
    }

    /// Whether `name` is one of the rule's path arguments.
    pub fn has_argument(&self, name: &str) -> bool {
        self.arguments.iter().any(|(n, _)| n == name)
    }

    pub fn argument_type(&self, name: &str) -> Option<ArgumentType> {
        self.arguments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ty)| *ty)
    }

    /// Union of path arguments and declared required arguments.
    ///
    /// Path arguments come first in rule order, then the remaining required
    /// names in lexical order.
    pub fn required_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.arguments.iter().map(|(n, _)| n.clone()).collect();
        for name in &self.required_arguments {
            if !self.has_argument(name) {
                names.push(name.clone());
            }
        }
        names
    }
}

/// How the route's view exposes handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// One callable serves every verb.
    #[default]
    Function,
    /// A class-based view with one callable per verb.
    MethodView,
}

/// Documentation source of a route handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Handler {
    pub name: String,
    #[serde(default)]
    pub view: ViewKind,
    /// Inline documentation: summary line, description, then YAML after `---`.
    #[serde(default)]
    pub docstring: Option<String>,
    /// Structured fragment attached to the handler, merged before the docstring.
    #[serde(default)]
    pub specs: Option<Value>,
}

impl Handler {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_docstring(mut self, doc: impl Into<String>) -> Self {
        self.docstring = Some(doc.into());
        self
    }

    pub fn with_specs(mut self, specs: Value) -> Self {
        self.specs = Some(specs);
        self
    }
}

/// Outcome of asking a route source for the handler of a verb.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerLookup {
    Found(Handler),
    /// Class-based view declaring zero methods; skipped without error.
    EmptyView,
    Missing,
}

/// Handlers registered for one route.
#[derive(Debug, Clone, Default)]
pub struct RouteHandlers {
    pub view: ViewKind,
    pub shared: Option<Handler>,
    pub per_verb: HashMap<Method, Handler>,
}

impl RouteHandlers {
    /// A function view: the same handler documents every verb.
    pub fn function(handler: Handler) -> Self {
        Self {
            view: ViewKind::Function,
            shared: Some(handler),
            per_verb: HashMap::new(),
        }
    }

    /// A class-based view with one handler per verb.
    pub fn method_view<I>(handlers: I) -> Self
    where
        I: IntoIterator<Item = (Method, Handler)>,
    {
        let per_verb = handlers
            .into_iter()
            .map(|(m, mut h)| {
                h.view = ViewKind::MethodView;
                (m, h)
            })
            .collect();
        Self {
            view: ViewKind::MethodView,
            shared: None,
            per_verb,
        }
    }

    pub fn lookup(&self, verb: &Method) -> HandlerLookup {
        if let Some(handler) = self.per_verb.get(verb) {
            return HandlerLookup::Found(handler.clone());
        }
        if let Some(handler) = &self.shared {
            return HandlerLookup::Found(handler.clone());
        }
        if self.view == ViewKind::MethodView && self.per_verb.is_empty() {
            return HandlerLookup::EmptyView;
        }
        HandlerLookup::Missing
    }
}
