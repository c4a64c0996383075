//! Dialect detection.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Interface description dialect of a parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecVersion {
    Swagger2,
    OpenApi3,
    Unknown,
}

impl SpecVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecVersion::Swagger2 => "swagger2",
            SpecVersion::OpenApi3 => "openapi3",
            SpecVersion::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SpecVersion::Unknown)
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the dialect from the `swagger` / `openapi` version markers.
pub fn detect_spec_version(document: &Value) -> SpecVersion {
    let marker = |key: &str| document.get(key).and_then(Value::as_str);
    if marker("swagger").is_some_and(|v| v.starts_with("2.")) {
        return SpecVersion::Swagger2;
    }
    if marker("openapi").is_some_and(|v| v.starts_with("3.")) {
        return SpecVersion::OpenApi3;
    }
    SpecVersion::Unknown
}

/// Whether the input names a remote document rather than a local file.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
