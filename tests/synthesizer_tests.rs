//! End-to-end synthesis over a route table loaded from YAML.
//!
//! Covers the observable contract of the generated document: path
//! parameters, paging, locale/timezone, auth responses, path templates,
//! proxy prefix handling, view edge cases and definition folding.

use http::Method;
use pyrin_swagger::config::parse_config;
use pyrin_swagger::route::{parse_route_table, Handler, Route, RouteHandlers, RouteTable};
use pyrin_swagger::{
    ApiDocument, RouteSource, SpecSynthesizer, StaticConfig, SwaggerConfig, SwaggerError,
    YamlDocstringExtractor,
};
use serde_json::{json, Value};
use std::sync::Arc;

mod common;
use common::fixtures::{CONFIG_YAML, ROUTES_YAML};

fn synthesizer_for(routes: impl RouteSource + 'static, config: SwaggerConfig) -> SpecSynthesizer {
    SpecSynthesizer::new(
        Arc::new(routes),
        Arc::new(StaticConfig::new(config)),
        Arc::new(YamlDocstringExtractor::new()),
    )
}

fn fixture_document() -> ApiDocument {
    let table = parse_route_table(ROUTES_YAML, true).unwrap();
    let config = parse_config(CONFIG_YAML, true).unwrap();
    synthesizer_for(table, config).build_document("swagger").unwrap()
}

fn names(operation: &Value) -> Vec<String> {
    operation["parameters"]
        .as_array()
        .map(|params| {
            params
                .iter()
                .map(|p| p["name"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_integer_path_parameter_is_unique_and_first() {
    let doc = fixture_document();
    for verb in ["get", "delete"] {
        let op = doc.operation("/users/{id}", verb).unwrap();
        let params = op["parameters"].as_array().unwrap();
        let ids: Vec<&Value> = params.iter().filter(|p| p["name"] == "id").collect();
        assert_eq!(ids.len(), 1);
        assert_eq!(params[0]["name"], "id");
        assert_eq!(params[0]["in"], "path");
        assert_eq!(params[0]["type"], "integer");
        assert_eq!(params[0]["required"], true);
    }
}

#[test]
fn test_paged_route_has_paging_parameters() {
    let doc = fixture_document();
    for verb in ["get", "post"] {
        let op = doc.operation("/users", verb).unwrap();
        let params = op["parameters"].as_array().unwrap();
        for name in ["page", "page_size"] {
            let p = params.iter().find(|p| p["name"] == name).unwrap();
            assert_eq!(p["in"], "query");
            assert_eq!(p["type"], "integer");
            assert_eq!(p["required"], false);
        }
    }
}

#[test]
fn test_location_follows_verb() {
    let doc = fixture_document();
    let get = doc.operation("/users", "get").unwrap();
    let post = doc.operation("/users", "post").unwrap();
    let find = |op: &Value| {
        op["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["name"] == "name")
            .cloned()
            .unwrap()
    };
    assert_eq!(find(get)["in"], "query");
    assert_eq!(find(post)["in"], "json");
    assert_eq!(post["responses"]["201"]["description"], "successful execution of service.");
}

#[test]
fn test_locale_and_timezone_everywhere() {
    let doc = fixture_document();
    for (path, ops) in &doc.paths {
        for (verb, op) in ops {
            let n = names(op);
            assert_eq!(n.iter().filter(|x| *x == "locale").count(), 1, "{verb} {path}");
            assert_eq!(n.iter().filter(|x| *x == "timezone").count(), 1, "{verb} {path}");
        }
    }
}

#[test]
fn test_auth_responses() {
    let doc = fixture_document();

    let delete = doc.operation("/users/{id}", "delete").unwrap();
    assert!(!delete["responses"]["401"]["description"].as_str().unwrap().is_empty());
    assert!(!delete["responses"]["403"]["description"].as_str().unwrap().is_empty());
    assert_eq!(delete["responses"]["204"]["description"], "deleted");
    assert_eq!(delete["security"], json!([{"Bearer": []}]));

    let me = doc.operation("/me", "get").unwrap();
    assert!(me["responses"].get("401").is_some());
    assert!(me["responses"].get("403").is_none());

    let public = doc.operation("/users", "get").unwrap();
    assert!(public["responses"].get("401").is_none());
    assert!(public.get("security").is_none());
}

#[test]
fn test_ignored_verbs_empty_views_and_doc_routes_are_skipped() {
    let doc = fixture_document();
    let users = &doc.paths["/users"];
    assert!(users.contains_key("get"));
    assert!(!users.contains_key("head"));
    assert!(!users.contains_key("options"));
    assert!(!doc.paths.contains_key("/empty"));
    assert!(!doc.paths.contains_key("/swagger/"));
}

#[test]
fn test_tags_from_first_segment() {
    let doc = fixture_document();
    assert_eq!(doc.operation("/users/{id}", "get").unwrap()["tags"], json!(["users"]));
}

#[test]
fn test_proxy_prefix_equal_to_base_path_is_not_repeated() {
    let table = RouteTable::new().with_route(
        Route::new("users.get", "/users/<id>", [Method::GET]),
        RouteHandlers::function(Handler::new("get_user")),
    );
    let mut config = SwaggerConfig::default();
    config.swagger_ui_prefix = Some("/api".to_string());
    config.base_path = Some("/api".to_string());

    let doc = synthesizer_for(table, config).build_document("swagger").unwrap();
    assert!(doc.paths.contains_key("/users/{id}"));
    assert!(!doc.paths.contains_key("/api/users/{id}"));
    assert_eq!(doc.extra["basePath"], "/api");
}

#[test]
fn test_missing_handler_names_the_rule() {
    let mut table = RouteTable::new();
    table.add(
        Route::new("orders.get", "/orders/<int:id>", [Method::GET, Method::PUT]),
        RouteHandlers::method_view([(Method::GET, Handler::new("get_order"))]),
    );
    let err = synthesizer_for(table, SwaggerConfig::default())
        .build_document("swagger")
        .unwrap_err();
    match err {
        SwaggerError::MissingHandler { rule, verb } => {
            assert_eq!(rule, "/orders/<int:id>");
            assert_eq!(verb, "PUT");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_endpoint_is_an_error() {
    let err = synthesizer_for(RouteTable::new(), SwaggerConfig::default())
        .build_document("apispec_2")
        .unwrap_err();
    assert!(matches!(err, SwaggerError::UnknownEndpoint(_)));
}

#[test]
fn test_rule_filter_selects_routes_per_spec() {
    let yaml = r#"
specs:
  - endpoint: v1
    route: /v1.json
    rule_filter: [/v1]
  - endpoint: all
    route: /all.json
"#;
    let table = RouteTable::new()
        .with_route(
            Route::new("v1.items", "/v1/items", [Method::GET]),
            RouteHandlers::function(Handler::new("v1_items")),
        )
        .with_route(
            Route::new("v2.items", "/v2/items", [Method::GET]),
            RouteHandlers::function(Handler::new("v2_items")),
        );
    let synth = synthesizer_for(table, parse_config(yaml, true).unwrap());

    let v1 = synth.build_document("v1").unwrap();
    assert_eq!(v1.paths.keys().collect::<Vec<_>>(), vec!["/v1/items"]);
    let all = synth.build_document("all").unwrap();
    assert_eq!(all.paths.len(), 2);
}

#[test]
fn test_inline_schema_ids_become_definitions() {
    let doc = r#"Create an order.
---
parameters:
  - name: body
    in: body
    schema:
      id: NewOrder
      type: object
      properties:
        item:
          id: Item
          type: object
responses:
  201:
    description: created
    schema:
      id: Order
      type: object
"#;
    let table = RouteTable::new().with_route(
        Route::new("orders.create", "/orders", [Method::POST]),
        RouteHandlers::function(Handler::new("create_order").with_docstring(doc)),
    );
    let out = synthesizer_for(table, SwaggerConfig::default())
        .build_document("swagger")
        .unwrap();

    let op = out.operation("/orders", "post").unwrap();
    assert_eq!(op["responses"]["201"]["description"], "created");
    assert_eq!(op["responses"]["201"]["schema"], json!({"$ref": "#/definitions/Order"}));
    let body = op["parameters"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "body")
        .unwrap();
    assert_eq!(body["schema"], json!({"$ref": "#/definitions/NewOrder"}));
    assert_eq!(
        out.definitions["NewOrder"]["properties"]["item"],
        json!({"$ref": "#/definitions/Item"})
    );
    assert!(out.definitions.contains_key("Item"));
    assert!(out.definitions["Order"].get("id").is_none());
}
