//! Extraction of a flat intermediate representation from OpenAPI 3.x documents.
//!
//! The engine takes an already-normalized document (Swagger 2.0 conversion and
//! external-reference bundling happen upstream, see `apigen-loader`) and
//! produces an [`Ir`]: the operation list and the schema list that code
//! generators consume.
//!
//! ```
//! use apigen_ir::{Document, extract};
//!
//! let doc = Document::from_json(r#"{
//!     "paths": { "/pets": { "get": { "responses": { "200": { "description": "ok" } } } } }
//! }"#).unwrap();
//! let ir = extract(&doc);
//! assert_eq!(ir.operations[0].operation_id, "listPets");
//! ```

pub mod document;
pub mod extract;
pub mod model;
pub mod naming;
pub mod operation_id;
pub mod schema;
pub mod types;

pub use document::{Document, DocumentError, EnumValue, Schema};
pub use extract::extract;
pub use model::{
    HttpMethod, Ir, OperationIR, ParamIR, ParamLocation, PropertyIR, SchemaIR, SchemaRef,
    SemanticType,
};
pub use operation_id::infer_operation_id;
pub use schema::{extract_properties, extract_schema_ref};
pub use types::normalize_type;
