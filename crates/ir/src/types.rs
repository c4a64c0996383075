//! Type normalization: schema node in, one semantic type out.
//!
//! Numeric precision and string formats are deliberately dropped here (a
//! `date-time` string is just `string`); format-specific behavior belongs to
//! sample-data generation, not type classification.

use crate::document::{Schema, SchemaType};
use crate::model::SemanticType;

/// Convert a schema node to its semantic type.
///
/// A bare `$ref` node has no declared type of its own and is never followed,
/// so it is `unknown`; the reference itself is carried separately as `ref`.
pub fn normalize_type(schema: &Schema) -> SemanticType {
    if schema.any_of.len() >= 2 {
        return resolve_union(schema);
    }

    match &schema.schema_type {
        Some(SchemaType::Single(name)) => declared_type(name, schema),
        Some(SchemaType::Multiple(names)) => {
            let real: Vec<SemanticType> = names
                .iter()
                .filter(|name| *name != "null")
                .map(|name| declared_type(name, schema))
                .collect();
            match real.len() {
                0 => untyped(schema),
                1 => real.into_iter().next().unwrap_or(SemanticType::Unknown),
                _ => collapse_or_union(real),
            }
        }
        None => untyped(schema),
    }
}

/// Resolve an `anyOf` list to the smallest usable semantic type.
///
/// Null sentinels go first, then a single survivor is normalized on its own,
/// then identical types collapse, then a value-or-list pair widens to
/// `array`, and anything left renders as a literal union.
fn resolve_union(schema: &Schema) -> SemanticType {
    let real = schema.real_variants();
    match real.as_slice() {
        [] => SemanticType::Unknown,
        [only] => normalize_type(only),
        variants => {
            let mapped: Vec<SemanticType> = variants.iter().map(|v| normalize_type(v)).collect();
            if all_equal(&mapped) {
                return mapped.into_iter().next().unwrap_or(SemanticType::Unknown);
            }
            let arrays = mapped.iter().filter(|ty| ty.is_array()).count();
            if mapped.len() == 2 && arrays == 1 {
                return SemanticType::Array;
            }
            SemanticType::union(mapped)
        }
    }
}

fn collapse_or_union(types: Vec<SemanticType>) -> SemanticType {
    if all_equal(&types) {
        types.into_iter().next().unwrap_or(SemanticType::Unknown)
    } else {
        SemanticType::union(types)
    }
}

fn all_equal(types: &[SemanticType]) -> bool {
    types.windows(2).all(|pair| pair[0] == pair[1])
}

fn declared_type(name: &str, schema: &Schema) -> SemanticType {
    match name {
        "integer" | "number" => SemanticType::Number,
        "boolean" => SemanticType::Boolean,
        "string" => SemanticType::String,
        "array" => SemanticType::Array,
        "object" => SemanticType::Object,
        _ => untyped(schema),
    }
}

/// Absent or unrecognized type: an object if it has properties, else unknown.
fn untyped(schema: &Schema) -> SemanticType {
    if schema.has_properties() {
        SemanticType::Object
    } else {
        SemanticType::Unknown
    }
}

/// Find the element schema of an array-shaped node.
///
/// Looks at the node's own `items` when it is declared as an array, and
/// otherwise at the first `anyOf` variant declared as an array.
pub fn array_items(schema: &Schema) -> Option<&Schema> {
    if schema.declares_type("array") {
        return schema.items.as_deref();
    }
    schema
        .any_of
        .iter()
        .find(|variant| variant.declares_type("array"))
        .and_then(|variant| variant.items.as_deref())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn ty(value: Value) -> String {
        let schema: Schema = serde_json::from_value(value).unwrap();
        normalize_type(&schema).to_string()
    }

    #[test]
    fn test_primitive_types() {
        assert_eq!(ty(json!({ "type": "integer", "format": "int64" })), "number");
        assert_eq!(ty(json!({ "type": "number", "format": "float" })), "number");
        assert_eq!(ty(json!({ "type": "boolean" })), "boolean");
        assert_eq!(ty(json!({ "type": "string", "format": "date-time" })), "string");
        assert_eq!(ty(json!({ "type": "string", "format": "date" })), "string");
        assert_eq!(ty(json!({ "type": "array", "items": { "type": "string" } })), "array");
        assert_eq!(ty(json!({ "type": "object" })), "object");
    }

    #[test]
    fn test_untyped_nodes() {
        assert_eq!(ty(json!({})), "unknown");
        assert_eq!(ty(json!({ "type": "file" })), "unknown");
        assert_eq!(ty(json!({ "properties": { "id": { "type": "string" } } })), "object");
        assert_eq!(
            ty(json!({ "type": "weird", "properties": { "id": { "type": "string" } } })),
            "object"
        );
    }

    #[test]
    fn test_references_are_untyped() {
        assert_eq!(ty(json!({ "$ref": "#/components/schemas/User" })), "unknown");
        assert_eq!(ty(json!({ "$ref": "#/properties/sibling" })), "unknown");
        assert_eq!(
            ty(json!({ "$ref": "#/components/schemas/User", "type": "object" })),
            "object"
        );
    }

    #[test]
    fn test_nullable_single_type_collapses() {
        assert_eq!(ty(json!({ "anyOf": [{ "type": "string" }, { "type": "null" }] })), "string");
        assert_eq!(
            ty(json!({ "anyOf": [{ "type": "string" }, { "enum": ["null"], "nullable": true }] })),
            "string"
        );
        assert_eq!(ty(json!({ "anyOf": [{ "type": "number" }, { "not": {} }] })), "number");
        assert_eq!(
            ty(json!({ "anyOf": [{ "type": "integer" }, { "type": "null" }, { "not": {} }] })),
            "number"
        );
    }

    #[test]
    fn test_same_type_variants_collapse() {
        assert_eq!(
            ty(json!({ "anyOf": [{ "type": "integer" }, { "type": "number" }] })),
            "number"
        );
        assert_eq!(
            ty(json!({ "anyOf": [
                { "$ref": "#/components/schemas/Cat" },
                { "$ref": "#/components/schemas/Dog" }
            ] })),
            "unknown"
        );
        assert_eq!(
            ty(json!({ "anyOf": [{ "$ref": "#/components/schemas/Cat" }, { "type": "string" }] })),
            "unknown | string"
        );
    }

    #[test]
    fn test_value_or_list_widens_to_array() {
        assert_eq!(
            ty(json!({ "anyOf": [
                { "type": "string" },
                { "type": "array", "items": { "type": "string" } }
            ] })),
            "array"
        );
        assert_eq!(
            ty(json!({ "anyOf": [
                { "type": "string" },
                { "type": "array", "items": { "type": "string" } },
                { "not": {} }
            ] })),
            "array"
        );
    }

    #[test]
    fn test_wider_unions_with_array_stay_literal() {
        assert_eq!(
            ty(json!({ "anyOf": [
                { "type": "string" },
                { "type": "number" },
                { "type": "array", "items": { "type": "string" } }
            ] })),
            "string | number | array"
        );
    }

    #[test]
    fn test_literal_union_preserves_order() {
        assert_eq!(
            ty(json!({ "anyOf": [{ "type": "string" }, { "type": "boolean" }, { "type": "number" }] })),
            "string | boolean | number"
        );
        assert_eq!(
            ty(json!({ "anyOf": [{ "type": "string" }, { "type": "boolean" }] })),
            "string | boolean"
        );
        assert_eq!(
            ty(json!({ "anyOf": [
                { "type": "string" }, { "type": "string" }, { "type": "boolean" }
            ] })),
            "string | string | boolean"
        );
    }

    #[test]
    fn test_nested_union_flattens() {
        assert_eq!(
            ty(json!({ "anyOf": [
                { "type": "string" },
                { "anyOf": [{ "type": "boolean" }, { "type": "number" }] }
            ] })),
            "string | boolean | number"
        );
    }

    #[test]
    fn test_degenerate_any_of() {
        assert_eq!(ty(json!({ "anyOf": [{ "type": "null" }, { "not": {} }] })), "unknown");
        // A single variant is not a union; the node's own type applies.
        assert_eq!(ty(json!({ "anyOf": [{ "type": "string" }] })), "unknown");
        assert_eq!(ty(json!({ "type": "boolean", "anyOf": [{ "type": "string" }] })), "boolean");
    }

    #[test]
    fn test_type_arrays() {
        assert_eq!(ty(json!({ "type": ["string", "null"] })), "string");
        assert_eq!(ty(json!({ "type": ["integer", "number"] })), "number");
        assert_eq!(ty(json!({ "type": ["string", "boolean"] })), "string | boolean");
        assert_eq!(ty(json!({ "type": ["null"] })), "unknown");
    }

    #[test]
    fn test_array_items() {
        let direct: Schema =
            serde_json::from_value(json!({ "type": "array", "items": { "type": "integer" } }))
                .unwrap();
        assert_eq!(normalize_type(array_items(&direct).unwrap()).to_string(), "number");

        let via_any_of: Schema = serde_json::from_value(json!({
            "anyOf": [{ "type": "string" }, { "type": "array", "items": { "type": "boolean" } }]
        }))
        .unwrap();
        assert_eq!(normalize_type(array_items(&via_any_of).unwrap()).to_string(), "boolean");

        let scalar: Schema = serde_json::from_value(json!({ "type": "string" })).unwrap();
        assert!(array_items(&scalar).is_none());
    }
}
