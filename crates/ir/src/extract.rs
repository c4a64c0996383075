//! The extraction pass: document view in, IR out.
//!
//! One linear walk over the operation table, then over the schema table.
//! The pass never fails: absent tables, parameters and bodies degrade to
//! empty lists or `None`.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::document::{Document, MediaType, Operation, PathItem, Parameter, Schema};
use crate::model::{
    HttpMethod, Ir, OperationIR, ParamIR, ParamLocation, SchemaIR, SchemaRef, SemanticType,
};
use crate::naming::{capitalize_first, reserve_unique};
use crate::operation_id::infer_operation_id;
use crate::schema::{extract_schema, extract_schema_ref};
use crate::types::normalize_type;

/// Success responses, in lookup priority order.
const SUCCESS_STATUSES: [&str; 3] = ["200", "201", "default"];

const JSON_MEDIA_TYPE: &str = "application/json";

/// Extract the IR from a normalized document.
pub fn extract(document: &Document) -> Ir {
    let table = document.schema_table();
    let mut pass = Extraction {
        operation_ids: explicit_operation_ids(document),
        schema_names: table.keys().cloned().collect(),
        synthesized: Vec::new(),
    };

    let mut operations = Vec::new();
    for (path, item) in &document.paths {
        for (method, op) in item.operations() {
            operations.push(pass.operation(path, method, op, &item.parameters));
        }
    }

    let mut schemas: Vec<SchemaIR> = table
        .iter()
        .map(|(name, schema)| extract_schema(name, schema))
        .collect();
    let synthesized = pass.synthesized.len();
    schemas.append(&mut pass.synthesized);

    debug!(
        operations = operations.len(),
        schemas = schemas.len(),
        synthesized,
        "Extracted IR."
    );

    Ir {
        operations,
        schemas,
    }
}

/// Every non-empty `operationId` in the document, so inferred ids avoid them
/// even when the explicit one is declared later.
fn explicit_operation_ids(document: &Document) -> HashSet<String> {
    document
        .paths
        .values()
        .flat_map(PathItem::operations)
        .filter_map(|(_, op)| op.operation_id.as_deref())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Mutable state of a single pass. Only ever appended to.
struct Extraction {
    operation_ids: HashSet<String>,
    schema_names: HashSet<String>,
    synthesized: Vec<SchemaIR>,
}

impl Extraction {
    fn operation(
        &mut self,
        path: &str,
        method: HttpMethod,
        op: &Operation,
        shared_params: &[Parameter],
    ) -> OperationIR {
        let operation_id = self.operation_id(path, method, op);
        let (path_params, query_params) = normalize_params(shared_params, &op.parameters);

        let request_body = op
            .request_body
            .as_ref()
            .and_then(|body| select_schema(&body.content))
            .map(|schema| self.body_ref(schema, &operation_id, "Body"));

        let response_schema = SUCCESS_STATUSES
            .iter()
            .find_map(|status| op.responses.get(*status))
            .and_then(|response| select_schema(&response.content))
            .map(|schema| self.body_ref(schema, &operation_id, "Response"));

        OperationIR {
            operation_id,
            method,
            path: path.to_string(),
            path_params,
            query_params,
            request_body,
            response_schema,
            tags: op.tags.clone(),
        }
    }

    /// Explicit ids are taken verbatim (and were reserved up front); inferred
    /// ids are made unique.
    fn operation_id(&mut self, path: &str, method: HttpMethod, op: &Operation) -> String {
        if let Some(id) = op.operation_id.as_deref().filter(|id| !id.is_empty()) {
            return id.to_string();
        }

        let inferred = infer_operation_id(method, path);
        let unique = reserve_unique(&inferred, &mut self.operation_ids);
        if unique == inferred {
            debug!(%method, path, operation_id = %unique, "Inferred operation id.");
        } else {
            warn!(
                %method,
                path,
                inferred = %inferred,
                operation_id = %unique,
                "Inferred operation id collides with an earlier operation; renamed."
            );
        }
        unique
    }

    /// Reference a body schema, synthesizing a named schema for inline objects.
    ///
    /// A nullable wrapper around an inline object is synthesized like the
    /// object itself.
    fn body_ref(&mut self, node: &Schema, operation_id: &str, suffix: &str) -> SchemaRef {
        let node = node.unwrap_nullable();
        if node.table_ref().is_none() && node.has_properties() {
            let base = format!("{}{suffix}", capitalize_first(operation_id));
            let name = reserve_unique(&base, &mut self.schema_names);
            if name != base {
                warn!(
                    schema = %base,
                    renamed = %name,
                    "Inline schema name already taken; renamed."
                );
            }
            debug!(schema = %name, operation_id, "Synthesized inline schema.");
            self.synthesized.push(extract_schema(&name, node));
            return SchemaRef::Named { name };
        }
        extract_schema_ref(node)
    }
}

/// Pick the body schema: JSON first, then any `+json` type, then anything with a schema.
fn select_schema(content: &IndexMap<String, MediaType>) -> Option<&Schema> {
    if let Some(schema) = content.get(JSON_MEDIA_TYPE).and_then(|m| m.schema.as_ref()) {
        return Some(schema);
    }
    content
        .iter()
        .filter(|(media_type, _)| media_type.ends_with("+json"))
        .chain(content.iter())
        .find_map(|(_, media)| media.schema.as_ref())
}

/// Merge path-level and operation-level parameters.
///
/// Operation-level entries override path-level entries with the same name and
/// location. Header and cookie parameters are skipped.
fn normalize_params(shared: &[Parameter], own: &[Parameter]) -> (Vec<ParamIR>, Vec<ParamIR>) {
    let mut merged: Vec<ParamIR> = Vec::new();
    for param in shared.iter().chain(own) {
        let Some(ir) = normalize_param(param) else {
            continue;
        };
        merged.retain(|existing| !(existing.name == ir.name && existing.location == ir.location));
        merged.push(ir);
    }

    merged
        .into_iter()
        .partition(|param| param.location == ParamLocation::Path)
}

fn normalize_param(param: &Parameter) -> Option<ParamIR> {
    let location = ParamLocation::parse(&param.location)?;
    if param.name.is_empty() {
        debug!(location = %param.location, "Skipping parameter without a name.");
        return None;
    }
    let ty = param
        .schema
        .as_ref()
        .map_or(SemanticType::Unknown, normalize_type);
    Some(ParamIR {
        name: param.name.clone(),
        ty,
        required: param.required,
        location,
    })
}
