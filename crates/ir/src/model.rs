//! IR types produced by the extraction engine.
//!
//! The IR is flat: schemas refer to each other by name only, never by nesting.
//! Every type serializes to camelCase JSON so generators written in any
//! language can consume it.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::document::EnumValue;

/// Complete extraction result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ir {
    /// Operations in document order (path, then method priority).
    pub operations: Vec<OperationIR>,
    /// Table schemas in declaration order, then synthesized inline schemas.
    pub schemas: Vec<SchemaIR>,
}

impl Ir {
    /// Look up a schema by name.
    pub fn schema(&self, name: &str) -> Option<&SchemaIR> {
        self.schemas.iter().find(|schema| schema.name == name)
    }

    /// Look up an operation by its identifier.
    pub fn operation(&self, operation_id: &str) -> Option<&OperationIR> {
        self.operations
            .iter()
            .find(|op| op.operation_id == operation_id)
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// All supported methods, in traversal priority order.
    pub const ALL: [Self; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Lowercase name, as used for document keys and inferred identifiers.
    pub fn key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic type of a value, independent of the document's raw type names.
///
/// Renders (and serializes) as `string`, `number`, `boolean`, `object`,
/// `array`, `unknown`, or a union such as `string | boolean`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Unknown,
    /// Literal union over primitives, in declaration order.
    Union(Vec<SemanticType>),
}

impl SemanticType {
    /// Build a union, flattening nested unions so members stay primitive.
    pub fn union(members: impl IntoIterator<Item = SemanticType>) -> Self {
        let mut flat = Vec::new();
        for member in members {
            match member {
                SemanticType::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        SemanticType::Union(flat)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, SemanticType::Array)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::String => f.write_str("string"),
            SemanticType::Number => f.write_str("number"),
            SemanticType::Boolean => f.write_str("boolean"),
            SemanticType::Object => f.write_str("object"),
            SemanticType::Array => f.write_str("array"),
            SemanticType::Unknown => f.write_str("unknown"),
            SemanticType::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for SemanticType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parameter location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
}

impl ParamLocation {
    /// Map a document `in` value; header and cookie parameters have no location here.
    pub fn parse(location: &str) -> Option<Self> {
        match location {
            "path" => Some(ParamLocation::Path),
            "query" => Some(ParamLocation::Query),
            _ => None,
        }
    }
}

/// A path or query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamIR {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: SemanticType,
    pub required: bool,
    pub location: ParamLocation,
}

/// Reference from an operation to a data shape.
///
/// A reference never carries a scalar type and a schema name at the same time.
///
/// Serialized flat, with every field present whatever the variant:
/// `{"kind", "type", "ref", "isArray", "itemRef", "itemType"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaRef {
    /// Shape with no named schema behind it.
    Primitive { ty: SemanticType },
    /// Named schema: a table entry or a synthesized inline schema.
    Named { name: String },
    /// Array whose elements are either a named schema or a primitive.
    Array {
        item_ref: Option<String>,
        item_type: Option<SemanticType>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SchemaRefRecord<'a> {
    kind: &'static str,
    #[serde(rename = "type")]
    ty: SemanticType,
    #[serde(rename = "ref")]
    ref_name: Option<&'a str>,
    is_array: bool,
    item_ref: Option<&'a str>,
    item_type: Option<&'a SemanticType>,
}

impl Serialize for SchemaRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = match self {
            SchemaRef::Primitive { .. } => "primitive",
            SchemaRef::Named { .. } => "named",
            SchemaRef::Array { .. } => "array",
        };
        let item_type = match self {
            SchemaRef::Array { item_type, .. } => item_type.as_ref(),
            _ => None,
        };
        SchemaRefRecord {
            kind,
            ty: self.semantic_type(),
            ref_name: self.ref_name(),
            is_array: self.is_array(),
            item_ref: self.item_ref(),
            item_type,
        }
        .serialize(serializer)
    }
}

impl SchemaRef {
    pub fn is_array(&self) -> bool {
        matches!(self, SchemaRef::Array { .. })
    }

    /// Schema name for a named reference.
    pub fn ref_name(&self) -> Option<&str> {
        match self {
            SchemaRef::Named { name } => Some(name),
            _ => None,
        }
    }

    /// Element schema name for an array of named schemas.
    pub fn item_ref(&self) -> Option<&str> {
        match self {
            SchemaRef::Array { item_ref, .. } => item_ref.as_deref(),
            _ => None,
        }
    }

    /// Semantic type of the referenced shape as a whole.
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            SchemaRef::Primitive { ty } => ty.clone(),
            SchemaRef::Named { .. } => SemanticType::Object,
            SchemaRef::Array { .. } => SemanticType::Array,
        }
    }
}

/// One HTTP verb + path combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationIR {
    /// Identifier, unique within the IR (e.g., "listItems").
    pub operation_id: String,
    pub method: HttpMethod,
    /// URL path (e.g., "/items/{itemId}").
    pub path: String,
    pub path_params: Vec<ParamIR>,
    pub query_params: Vec<ParamIR>,
    pub request_body: Option<SchemaRef>,
    pub response_schema: Option<SchemaRef>,
    pub tags: Vec<String>,
}

/// A named, flat record type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaIR {
    pub name: String,
    pub properties: Vec<PropertyIR>,
    pub required: Vec<String>,
}

impl SchemaIR {
    pub fn property(&self, name: &str) -> Option<&PropertyIR> {
        self.properties.iter().find(|prop| prop.name == name)
    }
}

/// Object property definition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyIR {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: SemanticType,
    pub required: bool,
    pub is_array: bool,
    /// Element type when the elements are not a named schema.
    pub item_type: Option<SemanticType>,
    /// Element schema name when the elements are a named schema.
    pub item_ref: Option<String>,
    /// Named schema this property points at.
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,
    pub enum_values: Option<Vec<EnumValue>>,
}
