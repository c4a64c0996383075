//! Text to JSON value, from either JSON or YAML source.

use std::path::Path;

use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;

use crate::error::LoadError;

/// Source syntax of a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
    /// Fetched text: try JSON, fall back to YAML.
    Sniff,
}

impl SourceFormat {
    /// `.json` files are JSON; everything else is read as YAML, a JSON superset.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SourceFormat::Json,
            _ => SourceFormat::Yaml,
        }
    }
}

/// Parse document text into a JSON value.
///
/// `origin` is the path or URL the text came from and only appears in errors.
pub fn parse_document(text: &str, format: SourceFormat, origin: &str) -> Result<Value, LoadError> {
    let parse_error = |message: String| LoadError::Parse {
        origin: origin.to_string(),
        message,
    };
    match format {
        SourceFormat::Json => serde_json::from_str(text).map_err(|err| parse_error(err.to_string())),
        SourceFormat::Yaml => parse_yaml(text).map_err(parse_error),
        SourceFormat::Sniff => match serde_json::from_str(text) {
            Ok(value) => Ok(value),
            Err(_) => parse_yaml(text).map_err(parse_error),
        },
    }
}

fn parse_yaml(text: &str) -> Result<Value, String> {
    let yaml: YamlValue = serde_yaml::from_str(text).map_err(|err| err.to_string())?;
    Ok(yaml_to_json(yaml))
}

/// Convert a YAML tree to JSON.
///
/// Non-string mapping keys (status codes written as `200:`) are stringified,
/// tags are dropped and non-finite floats become null.
fn yaml_to_json(yaml: YamlValue) -> Value {
    match yaml {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                object.insert(yaml_key(key), yaml_to_json(value));
            }
            Value::Object(object)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        YamlValue::Null => "null".to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_from_path() {
        assert_eq!(SourceFormat::from_path(Path::new("api.json")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("API.JSON")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("api.yaml")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("api.yml")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("openapi")), SourceFormat::Yaml);
    }

    #[test]
    fn test_parse_json() {
        let value = parse_document(r#"{"openapi":"3.0.0","paths":{}}"#, SourceFormat::Json, "a.json")
            .unwrap();
        assert_eq!(value, json!({ "openapi": "3.0.0", "paths": {} }));
    }

    #[test]
    fn test_parse_yaml_stringifies_keys() {
        let text = "openapi: 3.0.0\npaths:\n  /pets:\n    get:\n      responses:\n        200:\n          description: ok\n        default:\n          description: err\n";
        let value = parse_document(text, SourceFormat::Yaml, "a.yaml").unwrap();
        let responses = &value["paths"]["/pets"]["get"]["responses"];
        assert_eq!(responses["200"]["description"], "ok");
        assert_eq!(responses["default"]["description"], "err");
        // `3.0.0` is not a YAML number and stays a string.
        assert_eq!(value["openapi"], "3.0.0");
    }

    #[test]
    fn test_yaml_keeps_key_order() {
        let value = parse_document("b: 1\na: 2\nc: 3\n", SourceFormat::Yaml, "a.yaml").unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_yaml_scalars() {
        let value = parse_document(
            "int: 42\nneg: -3\nfloat: 1.5\nflag: true\nnothing: ~\nlist: [a, 1]\n",
            SourceFormat::Yaml,
            "a.yaml",
        )
        .unwrap();
        assert_eq!(
            value,
            json!({ "int": 42, "neg": -3, "float": 1.5, "flag": true, "nothing": null, "list": ["a", 1] })
        );
    }

    #[test]
    fn test_sniff_falls_back_to_yaml() {
        let json_text = parse_document(r#"{"swagger":"2.0"}"#, SourceFormat::Sniff, "u").unwrap();
        assert_eq!(json_text["swagger"], "2.0");
        let yaml_text = parse_document("swagger: '2.0'\n", SourceFormat::Sniff, "u").unwrap();
        assert_eq!(yaml_text["swagger"], "2.0");
    }

    #[test]
    fn test_parse_errors_name_the_origin() {
        let err = parse_document("{ not json", SourceFormat::Json, "broken.json").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse broken.json:"), "{err}");

        let err = parse_document("a: [unclosed", SourceFormat::Yaml, "broken.yaml").unwrap_err();
        assert!(matches!(err, LoadError::Parse { ref origin, .. } if origin == "broken.yaml"));
    }
}
