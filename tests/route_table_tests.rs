use http::Method;
use pyrin_swagger::route::{load_route_table, HandlerLookup};
use pyrin_swagger::{RouteSource, SpecSynthesizer, StaticConfig, SwaggerConfig, YamlDocstringExtractor};
use serde_json::json;
use std::sync::Arc;

mod common;
use common::fixtures::ROUTES_YAML;
use common::temp_files::{cleanup_temp_files, create_temp_json, create_temp_yaml};

const ROUTES_JSON: &str = r#"{
  "routes": [
    {
      "endpoint": "shops.items",
      "rule": "/shops/<uuid:shop_id>/items",
      "methods": ["GET", "POST"],
      "status_code": 202,
      "required_arguments": ["sku"],
      "handler": {
        "name": "shop_items",
        "specs": {
          "summary": "Shop items.",
          "parameters": [{"name": "sku", "in": "query", "type": "string"}]
        }
      }
    }
  ]
}"#;

#[test]
fn test_load_yaml_route_table() {
    let path = create_temp_yaml(ROUTES_YAML);
    let table = load_route_table(&path).unwrap();
    cleanup_temp_files(&[path]);

    assert_eq!(table.len(), 5);
    let item = table
        .routes()
        .iter()
        .find(|r| r.endpoint == "users.item")
        .unwrap()
        .clone();
    assert!(item.is_protected);
    assert_eq!(item.permissions, vec!["users.manage".to_string()]);
    match table.handler_for(&item, &Method::DELETE) {
        HandlerLookup::Found(h) => assert_eq!(h.name, "users.item.delete"),
        _ => panic!("expected DELETE handler"),
    }

    let empty = table.routes().iter().find(|r| r.endpoint == "empty").unwrap().clone();
    assert!(matches!(table.handler_for(&empty, &Method::GET), HandlerLookup::EmptyView));
}

#[test]
fn test_load_json_route_table_and_synthesize() {
    let path = create_temp_json(ROUTES_JSON);
    let table = load_route_table(&path).unwrap();
    cleanup_temp_files(&[path]);

    let synth = SpecSynthesizer::new(
        Arc::new(table),
        Arc::new(StaticConfig::new(SwaggerConfig::default())),
        Arc::new(YamlDocstringExtractor::new()),
    );
    let doc = synth.build_document("swagger").unwrap();

    let get = doc.operation("/shops/{shop_id}/items", "get").unwrap();
    assert_eq!(get["summary"], "Shop items.");
    assert_eq!(get["parameters"][0]["name"], "shop_id");
    assert_eq!(get["parameters"][0]["format"], "uuid");
    let sku = get["parameters"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "sku")
        .unwrap();
    assert_eq!(sku["in"], "query");
    assert_eq!(sku["required"], true);
    assert_eq!(get["responses"]["202"], json!({"description": "successful execution of service."}));

    let post = doc.operation("/shops/{shop_id}/items", "post").unwrap();
    assert!(post["responses"].get("201").is_none());
    assert!(post["responses"].get("202").is_some());
}

#[test]
fn test_invalid_table_reports_every_issue() {
    let yaml = r#"
routes:
  - endpoint: a
    rule: /a
  - endpoint: a
    rule: /a2
  - endpoint: b
    rule: no-slash
  - endpoint: c
    rule: /c
    methods: [GET]
    handlers:
      POST:
        docstring: nope
"#;
    let path = create_temp_yaml(yaml);
    let err = load_route_table(&path).unwrap_err();
    cleanup_temp_files(&[path]);

    let message = format!("{err:#}");
    assert!(message.contains("DuplicateEndpoint"));
    assert!(message.contains("InvalidRule"));
    assert!(message.contains("UnknownVerb"));
    assert!(message.contains("3 issue(s)"));
}

#[test]
fn test_missing_file_is_an_error() {
    let err = load_route_table("/definitely/not/here/routes.yaml").unwrap_err();
    assert!(format!("{err:#}").contains("failed to read route table"));
}
