use once_cell::sync::Lazy;
use regex::Regex;

use super::types::ArgumentType;

/// Matches `<name>`, `<converter:name>` and `<converter(args):name>` placeholders.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"<([^<>]*:)?([^<>]*)>").expect("placeholder regex is valid")
});

/// A single path placeholder found in a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub converter: Option<String>,
}

impl Placeholder {
    /// Type of the argument, derived from the converter name.
    pub fn argument_type(&self) -> ArgumentType {
        ArgumentType::from_converter(self.converter.as_deref())
    }
}

/// Parse placeholders of a rule in declaration order.
///
/// A name declared twice is reported once, at its first position.
pub fn parse_placeholders(rule: &str) -> Vec<Placeholder> {
    let mut found: Vec<Placeholder> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(rule) {
        let name = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
        if name.is_empty() || found.iter().any(|p| p.name == name) {
            continue;
        }
        let converter = caps.get(1).map(|m| {
            let raw = m.as_str().trim_end_matches(':');
            // `int(min=1)` -> `int`
            raw.split('(').next().unwrap_or(raw).trim().to_string()
        });
        found.push(Placeholder { name, converter });
    }
    found
}

/// Rewrite every rule placeholder to the `{name}` path-template syntax.
///
/// ```
/// use pyrin_swagger::route::to_path_template;
///
/// assert_eq!(
///     to_path_template("/users/<int:id>/posts/<slug>"),
///     "/users/{id}/posts/{slug}"
/// );
/// ```
pub fn to_path_template(rule: &str) -> String {
    PLACEHOLDER.replace_all(rule, "{$2}").into_owned()
}
