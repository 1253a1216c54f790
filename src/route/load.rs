use super::types::{Handler, HandlerLookup, Route, RouteHandlers, ViewKind};
use crate::source::RouteSource;
use crate::validator::{fail_if_issues, ValidationIssue};
use anyhow::Context;
use http::Method;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

/// On-disk shape of a route table file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteTableFile {
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

/// One route as declared in a route table file.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
    pub endpoint: String,
    pub rule: String,
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub paged: bool,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub required_arguments: Vec<String>,
    #[serde(default)]
    pub view: ViewKind,
    /// Handler shared by every verb of a function view.
    #[serde(default)]
    pub handler: Option<HandlerEntry>,
    /// Per-verb handlers of a method view, keyed by verb.
    #[serde(default)]
    pub handlers: BTreeMap<String, HandlerEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandlerEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub docstring: Option<String>,
    #[serde(default)]
    pub specs: Option<Value>,
}

fn default_methods() -> Vec<String> {
    vec!["GET".to_string()]
}

/// Registered routes and the handlers that document them.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    handlers: HashMap<String, RouteHandlers>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route; a later route with the same endpoint replaces the earlier one.
    pub fn add(&mut self, route: Route, handlers: RouteHandlers) {
        self.routes.retain(|r| r.endpoint != route.endpoint);
        self.handlers.insert(route.endpoint.clone(), handlers);
        self.routes.push(route);
    }

    pub fn with_route(mut self, route: Route, handlers: RouteHandlers) -> Self {
        self.add(route, handlers);
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Compile parsed file entries, reporting every problem at once.
    pub fn from_entries(entries: Vec<RouteEntry>) -> anyhow::Result<Self> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        let mut table = RouteTable::new();

        for entry in entries {
            let location = format!("{} → {}", entry.endpoint, entry.rule);
            if !seen.insert(entry.endpoint.clone()) {
                issues.push(ValidationIssue::new(
                    &location,
                    "DuplicateEndpoint",
                    format!("endpoint '{}' is registered more than once", entry.endpoint),
                ));
                continue;
            }
            if !entry.rule.starts_with('/') {
                issues.push(ValidationIssue::new(
                    &location,
                    "InvalidRule",
                    "rule must start with '/'",
                ));
                continue;
            }

            let mut methods = Vec::new();
            for raw in &entry.methods {
                match parse_method(raw) {
                    Some(m) => methods.push(m),
                    None => issues.push(ValidationIssue::new(
                        &location,
                        "InvalidMethod",
                        format!("'{raw}' is not a valid HTTP method"),
                    )),
                }
            }

            let mut per_verb = HashMap::new();
            for (raw, def) in &entry.handlers {
                let Some(method) = parse_method(raw) else {
                    issues.push(ValidationIssue::new(
                        &location,
                        "InvalidMethod",
                        format!("handler key '{raw}' is not a valid HTTP method"),
                    ));
                    continue;
                };
                if !methods.contains(&method) {
                    issues.push(ValidationIssue::new(
                        &location,
                        "UnknownVerb",
                        format!("handler declared for {method} which the route does not accept"),
                    ));
                    continue;
                }
                let fallback = format!("{}.{}", entry.endpoint, method.as_str().to_lowercase());
                per_verb.insert(method, def.to_handler(fallback, ViewKind::MethodView));
            }

            let shared = entry
                .handler
                .as_ref()
                .map(|def| def.to_handler(entry.endpoint.clone(), entry.view));

            let mut route = Route::new(entry.endpoint.clone(), entry.rule.clone(), methods)
                .with_required_arguments(entry.required_arguments.iter().cloned());
            if entry.protected {
                route = route.protected(entry.permissions.iter().cloned());
            }
            if entry.paged {
                route = route.paged();
            }
            if let Some(status) = entry.status_code {
                route = route.with_status_code(status);
            }

            let view = if per_verb.is_empty() { entry.view } else { ViewKind::MethodView };
            table.add(route, RouteHandlers { view, shared, per_verb });
        }

        fail_if_issues(issues)?;
        Ok(table)
    }
}

impl HandlerEntry {
    fn to_handler(&self, fallback_name: String, view: ViewKind) -> Handler {
        Handler {
            name: self.name.clone().unwrap_or(fallback_name),
            view,
            docstring: self.docstring.clone(),
            specs: self.specs.clone(),
        }
    }
}

/// Verbs a route may declare. Extension methods are rejected so a typo is
/// reported instead of documented.
const KNOWN_METHODS: [Method; 9] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
    Method::TRACE,
    Method::CONNECT,
];

fn parse_method(raw: &str) -> Option<Method> {
    let upper = raw.trim().to_ascii_uppercase();
    KNOWN_METHODS.into_iter().find(|m| m.as_str() == upper)
}

impl RouteSource for RouteTable {
    fn routes(&self) -> Vec<Route> {
        self.routes.clone()
    }

    fn handler_for(&self, route: &Route, verb: &Method) -> HandlerLookup {
        self.handlers
            .get(&route.endpoint)
            .map_or(HandlerLookup::Missing, |h| h.lookup(verb))
    }

    fn snapshot(&self) -> Arc<dyn RouteSource> {
        Arc::new(self.clone())
    }
}

/// Parse a route table from YAML or JSON text; `is_yaml` selects the format.
pub fn parse_route_table(content: &str, is_yaml: bool) -> anyhow::Result<RouteTable> {
    let file: RouteTableFile = if is_yaml {
        serde_yaml::from_str(content).context("route table is not valid YAML")?
    } else {
        serde_json::from_str(content).context("route table is not valid JSON")?
    };
    RouteTable::from_entries(file.routes)
}

/// Load a route table file, picking the format from its extension.
pub fn load_route_table(file_path: impl AsRef<Path>) -> anyhow::Result<RouteTable> {
    let path = file_path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route table {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    parse_route_table(&content, is_yaml)
        .with_context(|| format!("failed to load route table {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
routes:
  - endpoint: users.list
    rule: /users
    methods: [GET, POST]
    paged: true
    handler:
      docstring: |
        List users.
  - endpoint: users.item
    rule: /users/<int:id>
    methods: [get, delete]
    protected: true
    permissions: [users.manage]
    handlers:
      GET:
        docstring: Get one user.
      DELETE:
        name: remove_user
"#;

    #[test]
    fn test_parse_route_table() {
        let table = parse_route_table(TABLE, true).unwrap();
        assert_eq!(table.len(), 2);

        let list = &table.routes()[0];
        assert!(list.is_paged);
        assert_eq!(list.methods, vec![Method::GET, Method::POST]);
        assert!(matches!(table.handler_for(list, &Method::POST), HandlerLookup::Found(_)));

        let item = &table.routes()[1];
        assert!(item.is_protected);
        assert_eq!(item.permissions, vec!["users.manage"]);
        match table.handler_for(item, &Method::DELETE) {
            HandlerLookup::Found(h) => {
                assert_eq!(h.name, "remove_user");
                assert_eq!(h.view, ViewKind::MethodView);
            }
            other => panic!("unexpected lookup: {other:?}"),
        }
        match table.handler_for(item, &Method::GET) {
            HandlerLookup::Found(h) => assert_eq!(h.name, "users.item.get"),
            other => panic!("unexpected lookup: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_entries_are_all_reported() {
        let yaml = r#"
routes:
  - endpoint: a
    rule: a/no-slash
  - endpoint: b
    rule: /b
    methods: [GET]
    handlers:
      POST: { docstring: nope }
  - endpoint: b
    rule: /b2
"#;
        let err = parse_route_table(yaml, true).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("InvalidRule"));
        assert!(msg.contains("UnknownVerb"));
        assert!(msg.contains("DuplicateEndpoint"));
    }

    #[test]
    fn test_misspelled_method_is_rejected() {
        let yaml = r#"
routes:
  - endpoint: users
    rule: /users
    methods: [GTE, patch]
  - endpoint: items
    rule: /items
    methods: [GET]
    handlers:
      GETT: { docstring: nope }
"#;
        let err = parse_route_table(yaml, true).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("[InvalidMethod] users → /users: 'GTE' is not a valid HTTP method"));
        assert!(msg.contains("handler key 'GETT' is not a valid HTTP method"));
        assert!(msg.contains("2 issue(s)"));

        assert_eq!(parse_method(" patch "), Some(Method::PATCH));
        assert_eq!(parse_method("connect"), Some(Method::CONNECT));
        assert_eq!(parse_method("PURGE"), None);
    }

    #[test]
    fn test_empty_method_view_from_file() {
        let yaml = r#"
routes:
  - endpoint: empty
    rule: /empty
    view: method_view
"#;
        let table = parse_route_table(yaml, true).unwrap();
        let route = &table.routes()[0];
        assert_eq!(table.handler_for(route, &Method::GET), HandlerLookup::EmptyView);
    }
}
