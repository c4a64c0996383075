//! Intra-document bundling of reusable parameters, bodies and responses.
//!
//! The extraction engine reads parameters, request bodies and responses
//! directly, so pointers into `#/components/{parameters,requestBodies,responses}`
//! are replaced by their targets. Schema pointers are left alone: the engine
//! records them by name.

use serde_json::{Map, Value};
use tracing::warn;

/// Chains of pointers longer than this are left unresolved.
const MAX_REF_DEPTH: usize = 8;

const METHODS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];

/// Inline component pointers in every path item and operation.
pub fn bundle(document: &mut Value) {
    let components = document
        .get("components")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let Some(paths) = document.get_mut("paths").and_then(Value::as_object_mut) else {
        return;
    };

    for item in paths.values_mut() {
        let Some(item) = item.as_object_mut() else {
            continue;
        };
        inline_parameters(item, &components);
        for method in METHODS {
            let Some(op) = item.get_mut(method).and_then(Value::as_object_mut) else {
                continue;
            };
            inline_parameters(op, &components);
            if let Some(body) = op.get_mut("requestBody") {
                inline(body, &components);
            }
            if let Some(responses) = op.get_mut("responses").and_then(Value::as_object_mut) {
                responses
                    .values_mut()
                    .for_each(|response| inline(response, &components));
            }
        }
    }
}

fn inline_parameters(owner: &mut Map<String, Value>, components: &Map<String, Value>) {
    if let Some(params) = owner.get_mut("parameters").and_then(Value::as_array_mut) {
        params.iter_mut().for_each(|param| inline(param, components));
    }
}

/// Replace `node` by its pointer target until it is no longer a component pointer.
fn inline(node: &mut Value, components: &Map<String, Value>) {
    for _ in 0..MAX_REF_DEPTH {
        let Some(pointer) = node.get("$ref").and_then(Value::as_str) else {
            return;
        };
        match resolve(pointer, components) {
            Some(target) => *node = target.clone(),
            None => {
                if !pointer.starts_with("#/components/schemas/") {
                    warn!(pointer, "Leaving unresolvable reference in place.");
                }
                return;
            }
        }
    }
    warn!(depth = MAX_REF_DEPTH, "Reference chain too deep; left unresolved.");
}

fn resolve<'a>(pointer: &str, components: &'a Map<String, Value>) -> Option<&'a Value> {
    let rest = pointer.strip_prefix("#/components/")?;
    let (kind, name) = rest.split_once('/')?;
    if !matches!(kind, "parameters" | "requestBodies" | "responses") {
        return None;
    }
    components.get(kind)?.get(unescape(name).as_str())
}

/// JSON pointer unescaping (`~1` is `/`, `~0` is `~`).
fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn components() -> Value {
        json!({
            "schemas": { "Pet": { "type": "object" } },
            "parameters": {
                "Limit": { "name": "limit", "in": "query", "schema": { "type": "integer" } },
                "Alias": { "$ref": "#/components/parameters/Limit" },
                "a/b": { "name": "slashed", "in": "query" }
            },
            "requestBodies": {
                "PetBody": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } }
            },
            "responses": {
                "NotFound": { "description": "missing" }
            }
        })
    }

    #[test]
    fn test_inlines_component_pointers() {
        let mut doc = json!({
            "openapi": "3.0.0",
            "paths": { "/pets": {
                "parameters": [{ "$ref": "#/components/parameters/Limit" }],
                "post": {
                    "parameters": [
                        { "$ref": "#/components/parameters/Alias" },
                        { "$ref": "#/components/parameters/a~1b" }
                    ],
                    "requestBody": { "$ref": "#/components/requestBodies/PetBody" },
                    "responses": {
                        "200": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } },
                        "404": { "$ref": "#/components/responses/NotFound" }
                    }
                }
            } },
            "components": components()
        });
        bundle(&mut doc);

        let item = &doc["paths"]["/pets"];
        assert_eq!(item["parameters"][0]["name"], "limit");
        assert_eq!(item["post"]["parameters"][0]["name"], "limit");
        assert_eq!(item["post"]["parameters"][1]["name"], "slashed");
        assert_eq!(
            item["post"]["requestBody"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/Pet"
        );
        assert_eq!(item["post"]["responses"]["404"]["description"], "missing");
        assert_eq!(
            item["post"]["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/Pet"
        );
    }

    #[test]
    fn test_unresolvable_pointers_stay() {
        let mut doc = json!({
            "paths": { "/x": { "get": {
                "parameters": [{ "$ref": "#/components/parameters/Missing" }],
                "responses": { "200": { "$ref": "https://example.com/shared.yaml#/Ok" } }
            } } },
            "components": components()
        });
        bundle(&mut doc);
        let op = &doc["paths"]["/x"]["get"];
        assert_eq!(op["parameters"][0]["$ref"], "#/components/parameters/Missing");
        assert_eq!(op["responses"]["200"]["$ref"], "https://example.com/shared.yaml#/Ok");
    }

    #[test]
    fn test_reference_cycles_terminate() {
        let mut doc = json!({
            "paths": { "/x": { "get": {
                "parameters": [{ "$ref": "#/components/parameters/A" }],
                "responses": {}
            } } },
            "components": { "parameters": {
                "A": { "$ref": "#/components/parameters/B" },
                "B": { "$ref": "#/components/parameters/A" }
            } }
        });
        bundle(&mut doc);
        assert!(doc["paths"]["/x"]["get"]["parameters"][0].get("$ref").is_some());
    }

    #[test]
    fn test_documents_without_paths() {
        let mut doc = json!({ "openapi": "3.0.0" });
        bundle(&mut doc);
        assert_eq!(doc, json!({ "openapi": "3.0.0" }));
    }
}
