use crate::route::to_path_template;

/// Turn a route rule into the document's path key.
///
/// `prefix` (the reverse-proxy prefix) is prepended first; a `base_path` that
/// then prefixes the result is stripped again so it is not repeated under
/// the document's own `basePath`.
pub fn normalize_path(rule: &str, prefix: Option<&str>, base_path: Option<&str>) -> String {
    let mut path = format!("{}{}", prefix.unwrap_or(""), rule);

    if let Some(base) = base_path.map(|b| b.trim_end_matches('/')) {
        if !base.is_empty() {
            if let Some(stripped) = path.strip_prefix(base) {
                path = stripped.to_string();
            }
        }
    }

    if path.is_empty() {
        path.push('/');
    }
    to_path_template(&path)
}
