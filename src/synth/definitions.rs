//! Folding of inline schemas into the document's `definitions`.
//!
//! A schema written inline with an `id` key becomes a named definition and
//! is replaced at its use site by a `$ref`. Nested schemas are found through
//! `properties` and array `items`.

use crate::draft::OperationDraft;
use serde_json::{json, Map, Value};

/// Naming of folded definitions for one operation.
#[derive(Debug, Clone)]
pub struct IdScope {
    prefix: Option<String>,
}

impl IdScope {
    /// Ids are used as written.
    pub fn plain() -> Self {
        Self { prefix: None }
    }

    /// Ids become `<endpoint>_<verb>_<id>`, the endpoint kept as registered
    /// and the verb lowercased.
    pub fn prefixed(endpoint: &str, verb: &str) -> Self {
        Self {
            prefix: Some(format!("{}_{}_", endpoint, verb.to_lowercase())),
        }
    }

    pub fn name(&self, id: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{id}"),
            None => id.to_string(),
        }
    }
}

/// Move a schema's `id`-tagged parts into `found`, depth first.
pub fn extract_definitions(schema: &mut Value, scope: &IdScope, found: &mut Vec<(String, Value)>) {
    let Some(obj) = schema.as_object_mut() else {
        return;
    };

    if let Some(Value::Object(properties)) = obj.get_mut("properties") {
        for property in properties.values_mut() {
            extract_definitions(property, scope, found);
        }
    }
    if let Some(items) = obj.get_mut("items") {
        extract_definitions(items, scope, found);
    }

    let id = match obj.remove("id") {
        Some(Value::String(id)) => id,
        Some(other) => {
            // Not a definition id (e.g. a property literally named `id`); put it back.
            obj.insert("id".to_string(), other);
            return;
        }
        None => return,
    };

    let name = scope.name(&id);
    let reference = json!({ "$ref": format!("#/definitions/{name}") });
    let definition = std::mem::replace(schema, reference);
    found.push((name, definition));
}

/// Fold an operation's definitions into `definitions`, rewriting its inline schemas to `$ref`s.
pub fn fold_definitions(mut draft: OperationDraft, scope: &IdScope, definitions: &mut Map<String, Value>) -> OperationDraft {
    for (name, schema) in std::mem::take(&mut draft.definitions) {
        definitions.insert(name, schema);
    }

    let mut found = Vec::new();
    for parameter in draft.parameters.iter_mut() {
        if let Some(schema) = parameter.extra.get_mut("schema") {
            extract_definitions(schema, scope, &mut found);
        }
    }
    for response in draft.responses.values_mut() {
        if let Some(schema) = response.get_mut("schema") {
            extract_definitions(schema, scope, &mut found);
        }
    }
    if let Some(Value::Object(content)) = draft
        .request_body
        .as_mut()
        .and_then(|body| body.get_mut("content"))
    {
        for media in content.values_mut() {
            if let Some(schema) = media.get_mut("schema") {
                extract_definitions(schema, scope, &mut found);
            }
        }
    }

    for (name, schema) in found {
        let slot = definitions
            .entry(name)
            .or_insert_with(|| Value::Object(Map::new()));
        match (slot, schema) {
            (Value::Object(existing), Value::Object(fields)) => existing.extend(fields),
            (slot, schema) => *slot = schema,
        }
    }
    draft
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(value: Value) -> OperationDraft {
        OperationDraft::from_value(value).unwrap()
    }

    #[test]
    fn test_response_schema_with_id_becomes_ref() {
        let d = draft(json!({
            "responses": {
                "200": {
                    "description": "a user",
                    "schema": {
                        "id": "User",
                        "type": "object",
                        "properties": {
                            "group": {"id": "Group", "type": "object"},
                            "tags": {"type": "array", "items": {"id": "Tag", "type": "string"}},
                            "name": {"type": "string"}
                        }
                    }
                }
            }
        }));
        let mut definitions = Map::new();
        let d = fold_definitions(d, &IdScope::plain(), &mut definitions);

        assert_eq!(d.responses["200"]["schema"], json!({"$ref": "#/definitions/User"}));
        assert_eq!(
            definitions["User"]["properties"]["group"],
            json!({"$ref": "#/definitions/Group"})
        );
        assert_eq!(
            definitions["User"]["properties"]["tags"]["items"],
            json!({"$ref": "#/definitions/Tag"})
        );
        assert!(definitions["User"].get("id").is_none());
        assert_eq!(definitions["Group"], json!({"type": "object"}));
        assert_eq!(definitions["Tag"], json!({"type": "string"}));
    }

    #[test]
    fn test_prefixed_ids_and_plain_definitions() {
        let d = draft(json!({
            "definitions": {"Error": {"type": "object"}},
            "parameters": [{"name": "body", "in": "body", "schema": {"id": "NewUser", "type": "object"}}]
        }));
        let mut definitions = Map::new();
        let scope = IdScope::prefixed("Users.create", "POST");
        let d = fold_definitions(d, &scope, &mut definitions);

        assert!(d.definitions.is_empty());
        assert!(definitions.contains_key("Error"));
        assert!(definitions.contains_key("Users.create_post_NewUser"));
        assert_eq!(
            d.parameters[0].extra["schema"],
            json!({"$ref": "#/definitions/Users.create_post_NewUser"})
        );
    }

    #[test]
    fn test_non_string_id_is_not_a_definition() {
        let mut schema = json!({"type": "object", "id": {"type": "integer"}});
        let mut found = Vec::new();
        extract_definitions(&mut schema, &IdScope::plain(), &mut found);
        assert!(found.is_empty());
        assert_eq!(schema["id"], json!({"type": "integer"}));
    }
}
