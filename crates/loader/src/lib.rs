//! Document loading for apigen.
//!
//! Turns a file path or URL into a bundled OpenAPI 3.x JSON value that
//! [`apigen_ir::Document`](https://docs.rs/apigen-ir) can read: YAML and JSON
//! are both accepted, Swagger 2.0 is converted, and reusable parameters,
//! bodies and responses are inlined.

pub mod bundle;
pub mod discover;
pub mod error;
pub mod load;
pub mod parse;
pub mod swagger2;
pub mod version;

pub use bundle::bundle;
pub use discover::{DiscoverResult, WELL_KNOWN_PATHS, discover_spec};
pub use error::LoadError;
pub use load::{load_spec, normalize_document};
pub use parse::{SourceFormat, parse_document};
pub use swagger2::convert_swagger2;
pub use version::{SpecVersion, detect_spec_version, is_url};
