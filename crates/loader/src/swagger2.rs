//! Swagger 2.0 to OpenAPI 3.0 conversion.
//!
//! Covers the parts of the document the extraction engine reads: reusable
//! tables, parameters, bodies, responses and servers. Security definitions
//! and vendor extensions on operations are carried over untouched.

use serde_json::{Map, Value, json};
use tracing::{debug, warn};

const JSON_MEDIA_TYPE: &str = "application/json";
const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";
const MULTIPART_MEDIA_TYPE: &str = "multipart/form-data";

const METHODS: [&str; 7] = ["get", "put", "post", "delete", "options", "head", "patch"];

/// Parameter keys that describe the value and belong in `schema` under 3.0.
const SCHEMA_KEYS: [&str; 12] = [
    "type",
    "format",
    "items",
    "enum",
    "default",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "minLength",
    "maxLength",
    "pattern",
];

/// Pointer prefixes rewritten to their 3.0 component locations.
const REF_REWRITES: [(&str, &str); 3] = [
    ("#/definitions/", "#/components/schemas/"),
    ("#/parameters/", "#/components/parameters/"),
    ("#/responses/", "#/components/responses/"),
];

/// Convert a Swagger 2.0 document to OpenAPI 3.0.
///
/// Non-mapping input is returned unchanged.
pub fn convert_swagger2(swagger: Value) -> Value {
    let Value::Object(mut source) = swagger else {
        return swagger;
    };

    let doc_produces = string_list(source.get("produces"));
    let global_params = match source.remove("parameters") {
        Some(Value::Object(params)) => params,
        _ => Map::new(),
    };

    let mut out = Map::new();
    out.insert("openapi".to_string(), json!("3.0.0"));
    for key in ["info", "tags", "externalDocs", "security"] {
        if let Some(value) = source.remove(key) {
            out.insert(key.to_string(), value);
        }
    }

    let servers = servers(&source);
    if !servers.is_empty() {
        out.insert("servers".to_string(), Value::Array(servers));
    }

    let mut paths = Map::new();
    if let Some(Value::Object(source_paths)) = source.remove("paths") {
        for (path, item) in source_paths {
            let Value::Object(item) = item else {
                continue;
            };
            paths.insert(
                path,
                Value::Object(convert_path_item(item, &global_params, &doc_produces)),
            );
        }
    }
    out.insert("paths".to_string(), Value::Object(paths));

    out.insert(
        "components".to_string(),
        Value::Object(components(&mut source, global_params, &doc_produces)),
    );

    let mut converted = Value::Object(out);
    rewrite_refs(&mut converted);
    debug!("Converted Swagger 2.0 document to OpenAPI 3.0.");
    converted
}

fn components(source: &mut Map<String, Value>, global_params: Map<String, Value>, produces: &[String]) -> Map<String, Value> {
    let mut components = Map::new();
    if let Some(definitions) = source.remove("definitions") {
        components.insert("schemas".to_string(), definitions);
    }

    // Body and form parameters have no 3.0 parameter equivalent; they are
    // inlined into the operations that reference them.
    let params: Map<String, Value> = global_params
        .into_iter()
        .filter(|(_, param)| !is_body_like(param))
        .map(|(name, param)| (name, convert_param(param)))
        .collect();
    if !params.is_empty() {
        components.insert("parameters".to_string(), Value::Object(params));
    }

    if let Some(Value::Object(responses)) = source.remove("responses") {
        let responses: Map<String, Value> = responses
            .into_iter()
            .map(|(name, response)| (name, convert_response(response, produces)))
            .collect();
        components.insert("responses".to_string(), Value::Object(responses));
    }

    if let Some(schemes) = source.remove("securityDefinitions") {
        components.insert("securitySchemes".to_string(), schemes);
    }
    components
}

/// `host` + `basePath` per scheme; https when no scheme is declared.
fn servers(source: &Map<String, Value>) -> Vec<Value> {
    let host = source.get("host").and_then(Value::as_str);
    let base_path = source
        .get("basePath")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim_end_matches('/');

    let Some(host) = host else {
        if base_path.is_empty() {
            return Vec::new();
        }
        return vec![json!({ "url": base_path })];
    };

    let mut schemes = string_list(source.get("schemes"));
    if schemes.is_empty() {
        schemes.push("https".to_string());
    }
    schemes
        .iter()
        .map(|scheme| json!({ "url": format!("{scheme}://{host}{base_path}") }))
        .collect()
}

fn convert_path_item(
    mut item: Map<String, Value>,
    globals: &Map<String, Value>,
    doc_produces: &[String],
) -> Map<String, Value> {
    let shared = match item.remove("parameters") {
        Some(Value::Array(params)) => params,
        _ => Vec::new(),
    };
    let shared: Vec<Value> = shared
        .into_iter()
        .map(|param| inline_body_like_ref(param, globals))
        .collect();
    let (shared_body, shared_rest): (Vec<Value>, Vec<Value>) =
        shared.into_iter().partition(is_body_like);

    let mut out = Map::new();
    if !shared_rest.is_empty() {
        out.insert(
            "parameters".to_string(),
            Value::Array(shared_rest.into_iter().map(convert_param).collect()),
        );
    }

    for (key, value) in item {
        if !METHODS.contains(&key.as_str()) {
            out.insert(key, value);
            continue;
        }
        let Value::Object(op) = value else {
            continue;
        };
        let converted = convert_operation(op, &shared_body, globals, doc_produces);
        out.insert(key, Value::Object(converted));
    }
    out
}

fn convert_operation(
    mut op: Map<String, Value>,
    shared_body: &[Value],
    globals: &Map<String, Value>,
    doc_produces: &[String],
) -> Map<String, Value> {
    let mut produces = string_list(op.get("produces"));
    if produces.is_empty() {
        produces = doc_produces.to_vec();
    }
    op.remove("produces");
    op.remove("consumes");
    op.remove("schemes");

    let own = match op.remove("parameters") {
        Some(Value::Array(params)) => params,
        _ => Vec::new(),
    };

    let mut parameters = Vec::new();
    let mut body = None;
    let mut form = FormBody::default();
    let all = shared_body
        .iter()
        .cloned()
        .chain(own.into_iter().map(|param| inline_body_like_ref(param, globals)));
    for param in all {
        match param.get("in").and_then(Value::as_str) {
            Some("body") => body = Some(body_request(param)),
            Some("formData") => form.add(param),
            _ => parameters.push(convert_param(param)),
        }
    }

    if !parameters.is_empty() {
        op.insert("parameters".to_string(), Value::Array(parameters));
    }
    if let Some(body) = body.or_else(|| form.into_request_body()) {
        op.insert("requestBody".to_string(), body);
    }

    if let Some(Value::Object(responses)) = op.remove("responses") {
        let responses: Map<String, Value> = responses
            .into_iter()
            .map(|(status, response)| (status, convert_response(response, &produces)))
            .collect();
        op.insert("responses".to_string(), Value::Object(responses));
    }
    op
}

fn is_body_like(param: &Value) -> bool {
    matches!(
        param.get("in").and_then(Value::as_str),
        Some("body" | "formData")
    )
}

/// Replace a `#/parameters/<name>` pointer with its target when the target is
/// a body or form parameter; other pointers stay pointers.
fn inline_body_like_ref(param: Value, globals: &Map<String, Value>) -> Value {
    let target = param
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|pointer| pointer.strip_prefix("#/parameters/"))
        .and_then(|name| globals.get(name));
    match target {
        Some(target) if is_body_like(target) => target.clone(),
        _ => param,
    }
}

/// Move value-describing keys into `schema`.
fn convert_param(param: Value) -> Value {
    let Value::Object(mut param) = param else {
        return param;
    };
    if param.contains_key("$ref") {
        return Value::Object(param);
    }

    param.remove("collectionFormat");
    let mut schema = Map::new();
    for key in SCHEMA_KEYS {
        if let Some(value) = param.remove(key) {
            schema.insert(key.to_string(), value);
        }
    }
    if !schema.is_empty() {
        param.insert("schema".to_string(), Value::Object(schema));
    }
    if param.get("in").and_then(Value::as_str) == Some("path") {
        param.insert("required".to_string(), Value::Bool(true));
    }
    Value::Object(param)
}

fn body_request(param: Value) -> Value {
    let schema = param.get("schema").cloned().unwrap_or_else(|| json!({}));
    let mut body = Map::new();
    if let Some(description) = param.get("description") {
        body.insert("description".to_string(), description.clone());
    }
    body.insert(
        "content".to_string(),
        json!({ JSON_MEDIA_TYPE: { "schema": schema } }),
    );
    if param.get("required").and_then(Value::as_bool) == Some(true) {
        body.insert("required".to_string(), Value::Bool(true));
    }
    Value::Object(body)
}

/// Accumulates `formData` parameters into one object schema.
#[derive(Default)]
struct FormBody {
    properties: Map<String, Value>,
    required: Vec<Value>,
    multipart: bool,
}

impl FormBody {
    fn add(&mut self, param: Value) {
        let Some(name) = param.get("name").and_then(Value::as_str).map(str::to_string) else {
            warn!("Skipping formData parameter without a name.");
            return;
        };
        if param.get("required").and_then(Value::as_bool) == Some(true) {
            self.required.push(Value::String(name.clone()));
        }

        let mut schema = Map::new();
        if param.get("type").and_then(Value::as_str) == Some("file") {
            self.multipart = true;
            schema.insert("type".to_string(), json!("string"));
            schema.insert("format".to_string(), json!("binary"));
        } else {
            for key in SCHEMA_KEYS {
                if let Some(value) = param.get(key) {
                    schema.insert(key.to_string(), value.clone());
                }
            }
        }
        if let Some(description) = param.get("description") {
            schema.insert("description".to_string(), description.clone());
        }
        self.properties.insert(name, Value::Object(schema));
    }

    fn into_request_body(self) -> Option<Value> {
        if self.properties.is_empty() {
            return None;
        }
        let media_type = if self.multipart {
            MULTIPART_MEDIA_TYPE
        } else {
            FORM_MEDIA_TYPE
        };
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(self.properties));
        if !self.required.is_empty() {
            schema.insert("required".to_string(), Value::Array(self.required));
        }
        Some(json!({ "content": { media_type: { "schema": schema } } }))
    }
}

/// Wrap a response `schema` in `content`, keyed by the preferred media type.
fn convert_response(response: Value, produces: &[String]) -> Value {
    let Value::Object(mut response) = response else {
        return response;
    };
    if response.contains_key("$ref") {
        return Value::Object(response);
    }
    if let Some(schema) = response.remove("schema") {
        let media_type = response_media_type(produces);
        response.insert(
            "content".to_string(),
            json!({ media_type: { "schema": schema } }),
        );
    }
    response.remove("examples");
    if !response.contains_key("description") {
        response.insert("description".to_string(), json!(""));
    }
    Value::Object(response)
}

fn response_media_type(produces: &[String]) -> &str {
    produces
        .iter()
        .find(|media| media.as_str() == JSON_MEDIA_TYPE || media.ends_with("+json"))
        .or_else(|| produces.iter().find(|media| media.contains("json")))
        .map_or(JSON_MEDIA_TYPE, String::as_str)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Rewrite 2.0 pointers and turn `x-nullable` into `nullable`, recursively.
fn rewrite_refs(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(pointer)) = map.get_mut("$ref") {
                for (from, to) in REF_REWRITES {
                    if let Some(rest) = pointer.strip_prefix(from) {
                        *pointer = format!("{to}{rest}");
                        break;
                    }
                }
            }
            if let Some(nullable) = map.remove("x-nullable") {
                map.entry("nullable").or_insert(nullable);
            }
            for child in map.values_mut() {
                rewrite_refs(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(rewrite_refs),
        _ => {}
    }
}
