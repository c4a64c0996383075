//! Read-only view over a normalized OpenAPI 3.x document.
//!
//! Only the handful of fields the extraction engine reads are modeled here.
//! Unknown keys are ignored, and a recognized key whose JSON shape is not the
//! expected one deserializes as if it were absent: documents in the wild are
//! frequently sloppy and the engine must stay total over them.

use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::HttpMethod;

const TABLE_REF_PREFIX: &str = "#/components/schemas/";
const LOCAL_PROPERTY_REF_PREFIX: &str = "#/properties/";

/// Errors raised when turning a raw JSON value into a [`Document`].
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The document root is a scalar or a sequence.
    #[error("document root must be a mapping, found {0}")]
    NotAMapping(&'static str),
    /// serde rejected the document.
    #[error("failed to read document: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Root of a normalized document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    /// Operation table keyed by path template, in declaration order.
    #[serde(default, deserialize_with = "lenient_map")]
    pub paths: IndexMap<String, PathItem>,
    /// Reusable components. Absent components behave as empty tables.
    #[serde(default, deserialize_with = "lenient")]
    pub components: Components,
}

/// Components section containing reusable schemas.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    /// Reusable-schema table keyed by name, in declaration order.
    #[serde(default, deserialize_with = "lenient_map")]
    pub schemas: IndexMap<String, Schema>,
}

/// A path item containing operations for different HTTP methods.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    #[serde(default, deserialize_with = "lenient")]
    pub get: Option<Operation>,
    #[serde(default, deserialize_with = "lenient")]
    pub post: Option<Operation>,
    #[serde(default, deserialize_with = "lenient")]
    pub put: Option<Operation>,
    #[serde(default, deserialize_with = "lenient")]
    pub delete: Option<Operation>,
    #[serde(default, deserialize_with = "lenient")]
    pub patch: Option<Operation>,
    /// Path-level parameters shared by all operations.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub parameters: Vec<Parameter>,
}

/// An API operation (endpoint).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, deserialize_with = "lenient")]
    pub operation_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub parameters: Vec<Parameter>,
    #[serde(default, deserialize_with = "lenient")]
    pub request_body: Option<RequestBody>,
    #[serde(default, deserialize_with = "lenient_map")]
    pub responses: IndexMap<String, Response>,
}

/// A parameter (query, path, header or cookie).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Parameter {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(rename = "in", default, deserialize_with = "lenient")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient")]
    pub required: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub schema: Option<Schema>,
}

/// A request body definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    #[serde(default, deserialize_with = "lenient")]
    pub required: bool,
    #[serde(default, deserialize_with = "lenient_map")]
    pub content: IndexMap<String, MediaType>,
}

/// A response definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    #[serde(default, deserialize_with = "lenient_map")]
    pub content: IndexMap<String, MediaType>,
}

/// Media type content (e.g., application/json).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    #[serde(default, deserialize_with = "lenient")]
    pub schema: Option<Schema>,
}

/// JSON Schema node, reduced to the keywords the engine classifies on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Schema {
    /// Declared type: a single name or, in 3.1 documents, a list of names.
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub schema_type: Option<SchemaType>,

    /// Format hint (e.g., date-time, uuid). Never affects classification.
    #[serde(default, deserialize_with = "lenient")]
    pub format: Option<String>,

    /// Pointer into the schema table or to a sibling property.
    #[serde(rename = "$ref", default, deserialize_with = "lenient")]
    pub ref_path: Option<String>,

    /// Object properties in declaration order.
    #[serde(default, deserialize_with = "lenient_map")]
    pub properties: IndexMap<String, Schema>,

    /// Required property names.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub required: Vec<String>,

    /// Item schema for array types.
    #[serde(default, deserialize_with = "lenient")]
    pub items: Option<Box<Schema>>,

    /// Literal values the node is restricted to.
    #[serde(rename = "enum", default, deserialize_with = "lenient")]
    pub enum_values: Option<Vec<EnumValue>>,

    /// Union variants.
    #[serde(rename = "anyOf", default, deserialize_with = "lenient_vec")]
    pub any_of: Vec<Schema>,

    /// Negated schema. Only `{}` matters: it marks an always-absent variant.
    #[serde(default)]
    pub not: Option<Value>,

    /// OpenAPI 3.0 nullable flag.
    #[serde(default, deserialize_with = "lenient")]
    pub nullable: Option<bool>,
}

/// Enum value can be string, integer, float, boolean, or null.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EnumValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// Schema type can be a single type or an array of types (for nullable).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

impl Document {
    /// Build the typed view from an already-parsed document value.
    pub fn from_value(value: &Value) -> Result<Self, DocumentError> {
        let kind = match value {
            Value::Object(_) => return Ok(Self::deserialize(value)?),
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "a sequence",
        };
        Err(DocumentError::NotAMapping(kind))
    }

    /// Parse a JSON document text.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// The reusable-schema table; empty when the document declares none.
    pub fn schema_table(&self) -> &IndexMap<String, Schema> {
        &self.components.schemas
    }
}

impl PathItem {
    /// Declared operations in the fixed method priority order.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        HttpMethod::ALL.into_iter().filter_map(move |method| {
            let op = match method {
                HttpMethod::Get => self.get.as_ref(),
                HttpMethod::Post => self.post.as_ref(),
                HttpMethod::Put => self.put.as_ref(),
                HttpMethod::Delete => self.delete.as_ref(),
                HttpMethod::Patch => self.patch.as_ref(),
            };
            op.map(|op| (method, op))
        })
    }
}

impl Schema {
    /// Name of the schema-table entry this node points at, if any.
    pub fn table_ref(&self) -> Option<String> {
        self.ref_path
            .as_deref()
            .and_then(|path| path.strip_prefix(TABLE_REF_PREFIX))
            .map(unescape_pointer)
    }

    /// Name of the sibling property this node points at (`#/properties/<name>`).
    pub fn local_property_ref(&self) -> Option<String> {
        self.ref_path
            .as_deref()
            .and_then(|path| path.strip_prefix(LOCAL_PROPERTY_REF_PREFIX))
            .map(unescape_pointer)
    }

    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    /// Check whether `name` is (one of) the declared type(s).
    pub fn declares_type(&self, name: &str) -> bool {
        match &self.schema_type {
            Some(SchemaType::Single(t)) => t == name,
            Some(SchemaType::Multiple(types)) => types.iter().any(|t| t == name),
            None => false,
        }
    }

    /// Check if this variant only stands for "absent" inside an `anyOf`.
    pub fn is_null_sentinel(&self) -> bool {
        let null_type = match &self.schema_type {
            Some(SchemaType::Single(t)) => t == "null",
            Some(SchemaType::Multiple(types)) => {
                !types.is_empty() && types.iter().all(|t| t == "null")
            }
            None => false,
        };
        if null_type {
            return true;
        }

        if matches!(&self.not, Some(Value::Object(map)) if map.is_empty()) {
            return true;
        }

        self.nullable == Some(true) && self.enum_values.as_deref().is_some_and(is_null_literal_list)
    }

    /// Variants of `anyOf` that are not null sentinels.
    pub fn real_variants(&self) -> Vec<&Schema> {
        self.any_of
            .iter()
            .filter(|variant| !variant.is_null_sentinel())
            .collect()
    }

    /// Get the non-null schema from an `anyOf` that only wraps one real variant.
    ///
    /// Any other node is returned unchanged.
    pub fn unwrap_nullable(&self) -> &Schema {
        if self.any_of.len() < 2 {
            return self;
        }
        match self.real_variants().as_slice() {
            [only] => only,
            _ => self,
        }
    }
}

fn is_null_literal_list(values: &[EnumValue]) -> bool {
    match values {
        [EnumValue::Null] => true,
        [EnumValue::String(s)] => s == "null",
        _ => false,
    }
}

/// Undo JSON pointer escaping (`~1` is `/`, `~0` is `~`).
fn unescape_pointer(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Deserialize `T`, falling back to its default when the value has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Deserialize a mapping entry by entry, dropping entries with the wrong shape.
fn lenient_map<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(IndexMap::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| serde_json::from_value(value).ok().map(|v| (key, v)))
        .collect())
}

/// Deserialize a sequence element by element, dropping elements with the wrong shape.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
