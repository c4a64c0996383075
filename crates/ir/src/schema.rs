//! Property and schema-reference extraction.
//!
//! Table references (`#/components/schemas/<name>`) are recorded by name and
//! never followed. That keeps self-referencing and mutually-referencing
//! schemas flat: there is no traversal that could loop. Sibling pointers
//! (`#/properties/<name>`) are the one exception; they are substituted one
//! level deep before classification.

use indexmap::IndexMap;

use crate::document::Schema;
use crate::model::{PropertyIR, SchemaIR, SchemaRef};
use crate::types::{array_items, normalize_type};

/// Build a flat schema record from an object node.
pub fn extract_schema(name: &str, schema: &Schema) -> SchemaIR {
    SchemaIR {
        name: name.to_string(),
        properties: extract_properties(schema),
        required: schema.required.clone(),
    }
}

/// Normalize every property of an object node, in declaration order.
pub fn extract_properties(schema: &Schema) -> Vec<PropertyIR> {
    schema
        .properties
        .iter()
        .map(|(name, node)| extract_property(name, node, &schema.properties, &schema.required))
        .collect()
}

fn extract_property(
    name: &str,
    node: &Schema,
    siblings: &IndexMap<String, Schema>,
    required: &[String],
) -> PropertyIR {
    let resolved = resolve_sibling_ref(node, siblings);
    let ty = normalize_type(resolved);
    let is_array = resolved.declares_type("array") || ty.is_array();

    let items = if is_array {
        array_items(resolved).map(|items| resolve_sibling_ref(items, siblings))
    } else {
        None
    };
    let item_ref = items.and_then(Schema::table_ref);
    let item_type = match (items, &item_ref) {
        (Some(items), None) => Some(normalize_type(items)),
        _ => None,
    };

    // Nullable wrappers around a reference or an enum still carry it.
    let target = resolved.unwrap_nullable();

    PropertyIR {
        name: name.to_string(),
        ty,
        required: required.iter().any(|r| r == name),
        is_array,
        item_type,
        item_ref,
        ref_name: target.table_ref(),
        enum_values: target.enum_values.clone(),
    }
}

/// Substitute a `#/properties/<sibling>` pointer with the sibling's own node.
///
/// Only one level is resolved; a sibling that is itself a sibling pointer is
/// used as-is.
fn resolve_sibling_ref<'a>(node: &'a Schema, siblings: &'a IndexMap<String, Schema>) -> &'a Schema {
    node.local_property_ref()
        .and_then(|sibling| siblings.get(&sibling))
        .unwrap_or(node)
}

/// Classify a body node that has no properties of its own.
///
/// Table references become named references, array nodes become array
/// references, anything else carries only its primitive type.
pub fn extract_schema_ref(node: &Schema) -> SchemaRef {
    let node = node.unwrap_nullable();
    if let Some(name) = node.table_ref() {
        return SchemaRef::Named { name };
    }

    let ty = normalize_type(node);
    if node.declares_type("array") || ty.is_array() {
        let items = array_items(node);
        let item_ref = items.and_then(Schema::table_ref);
        let item_type = match (items, &item_ref) {
            (Some(items), None) => Some(normalize_type(items)),
            _ => None,
        };
        return SchemaRef::Array {
            item_ref,
            item_type,
        };
    }

    SchemaRef::Primitive { ty }
}
