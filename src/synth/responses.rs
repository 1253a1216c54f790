//! Security requirements, standard responses and tags.

use crate::draft::OperationDraft;
use crate::route::Route;
use crate::source::{StatusCodeResolver, TagResolver};
use http::Method;
use serde_json::json;
use std::collections::BTreeMap;

pub const UNAUTHORIZED_DESCRIPTION: &str = "user has not been authenticated.";
pub const FORBIDDEN_DESCRIPTION: &str = "you do not have the required permissions to access this resource.";
pub const SUCCESS_DESCRIPTION: &str = "successful execution of service.";

/// Leave an authored response for `code` alone.
fn set_response_if_absent(draft: &mut OperationDraft, code: u16, description: &str) {
    draft
        .responses
        .entry(code.to_string())
        .or_insert_with(|| json!({ "description": description }));
}

/// Appends `{scheme: []}` per configured scheme to protected routes.
///
/// Entries are not de-duplicated, so callers run this once per fresh draft.
///
/// # Arguments
///
/// * `route` - Only routes marked protected get requirements
/// * `schemes` - Names from `securityDefinitions`, in order
/// * `draft` - The operation being assembled
pub fn inject_security_requirements(route: &Route, schemes: &[String], mut draft: OperationDraft) -> OperationDraft {
    if !route.is_protected {
        return draft;
    }
    for scheme in schemes {
        let mut requirement = BTreeMap::new();
        requirement.insert(scheme.clone(), Vec::new());
        draft.security.push(requirement);
    }
    draft
}

/// Document a `401` on protected routes unless the author already did.
pub fn inject_auth_failure_response(route: &Route, mut draft: OperationDraft) -> OperationDraft {
    if route.is_protected {
        set_response_if_absent(&mut draft, 401, UNAUTHORIZED_DESCRIPTION);
    }
    draft
}

/// Document a `403` on protected routes that require permissions.
///
/// A protected route with no permissions can only fail authentication, so it
/// gets no `403`.
pub fn inject_permission_denied_response(route: &Route, mut draft: OperationDraft) -> OperationDraft {
    if route.is_protected && !route.permissions.is_empty() {
        set_response_if_absent(&mut draft, 403, FORBIDDEN_DESCRIPTION);
    }
    draft
}

/// Document the success response unless its status code is already present.
///
/// # Arguments
///
/// * `route` - Its explicit `status_code` wins over the resolver
/// * `verb` - Passed to `resolver` when the route declares no status
/// * `resolver` - Default status per verb, e.g. [`crate::source::DefaultStatusCodes`]
/// * `draft` - The operation being assembled
pub fn inject_success_response(
    route: &Route,
    verb: &Method,
    resolver: &dyn StatusCodeResolver,
    mut draft: OperationDraft,
) -> OperationDraft {
    let code = route.status_code.unwrap_or_else(|| resolver.status_code(verb));
    set_response_if_absent(&mut draft, code, SUCCESS_DESCRIPTION);
    draft
}

/// Append the tags `resolver` assigns to this route and verb.
pub fn inject_tags(route: &Route, verb: &Method, resolver: &dyn TagResolver, mut draft: OperationDraft) -> OperationDraft {
    let tags = resolver.tags(route, verb);
    if !tags.is_empty() {
        draft.tags.extend(tags);
    }
    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{DefaultStatusCodes, SegmentTagResolver};

    #[test]
    fn test_public_route_gets_no_auth_responses() {
        let route = Route::new("r", "/r", [Method::GET]);
        let draft = inject_auth_failure_response(&route, OperationDraft::default());
        let draft = inject_permission_denied_response(&route, draft);
        let draft = inject_security_requirements(&route, &["Bearer".to_string()], draft);
        assert!(draft.responses.is_empty());
        assert!(draft.security.is_empty());
    }

    #[test]
    fn test_protected_without_permissions_has_no_403() {
        let route = Route::new("r", "/r", [Method::GET]).protected(Vec::<String>::new());
        let draft = inject_auth_failure_response(&route, OperationDraft::default());
        let draft = inject_permission_denied_response(&route, draft);
        assert_eq!(draft.responses["401"]["description"], UNAUTHORIZED_DESCRIPTION);
        assert!(!draft.responses.contains_key("403"));
    }

    #[test]
    fn test_authored_response_is_kept() {
        let route = Route::new("r", "/r", [Method::GET]).protected(["admin"]);
        let mut draft = OperationDraft::default();
        draft
            .responses
            .insert("403".to_string(), json!({"description": "admins only"}));
        let draft = inject_permission_denied_response(&route, draft);
        assert_eq!(draft.responses["403"]["description"], "admins only");
    }

    #[test]
    fn test_security_appended_without_dedup() {
        let route = Route::new("r", "/r", [Method::GET]).protected(["admin"]);
        let schemes = vec!["Bearer".to_string()];
        let draft = inject_security_requirements(&route, &schemes, OperationDraft::default());
        let draft = inject_security_requirements(&route, &schemes, draft);
        assert_eq!(draft.security.len(), 2);
        assert!(draft.security[0]["Bearer"].is_empty());
    }

    #[test]
    fn test_success_code_resolution() {
        let route = Route::new("r", "/r", [Method::POST, Method::GET]);
        let draft = inject_success_response(&route, &Method::POST, &DefaultStatusCodes, OperationDraft::default());
        assert_eq!(draft.responses["201"]["description"], SUCCESS_DESCRIPTION);

        let route = route.with_status_code(202);
        let draft = inject_success_response(&route, &Method::POST, &DefaultStatusCodes, OperationDraft::default());
        assert!(draft.responses.contains_key("202"));
        assert!(!draft.responses.contains_key("201"));
    }

    #[test]
    fn test_tags_appended() {
        let route = Route::new("r", "/orders/<int:id>", [Method::GET]);
        let mut draft = OperationDraft::default();
        draft.tags.push("custom".to_string());
        let draft = inject_tags(&route, &Method::GET, &SegmentTagResolver, draft);
        assert_eq!(draft.tags, vec!["custom", "orders"]);
    }
}
