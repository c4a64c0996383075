//! Operation identifier inference for operations without an `operationId`.
//!
//! Precedence is fixed: explicit id, then action-suffix pattern, then
//! verb + resource, then the root fallback. Real-world documents rely on the
//! action vocabulary, so reordering these changes generated binding names.

use crate::model::HttpMethod;
use crate::naming::{is_path_param_segment, is_version_segment, segment_to_pascal};

/// Trailing path segments that name an action on the preceding resource.
const ACTION_VOCABULARY: [(&str, &str); 8] = [
    ("search", "search"),
    ("get-by-id", "getById"),
    ("get-by-ids", "getByIds"),
    ("get-by-query", "getByQuery"),
    ("upsert", "upsert"),
    ("delete", "delete"),
    ("create", "create"),
    ("update", "update"),
];

fn action_for(segment: &str) -> Option<&'static str> {
    ACTION_VOCABULARY
        .iter()
        .find(|(suffix, _)| *suffix == segment)
        .map(|(_, action)| *action)
}

fn verb_for(method: HttpMethod) -> &'static str {
    if method.is_query() { "list" } else { method.key() }
}

/// Synthesize an operation identifier from method and path.
///
/// Version segments (`v1`, `v2`) never name a resource. One that appears
/// after the resource segment is kept as a capitalized suffix
/// (`/sdkrw/v2/get-by-query` -> `getByQuerySdkrwV2`); one in front of it is
/// only a prefix and is dropped (`/v2/users` -> `listUsers`).
pub fn infer_operation_id(method: HttpMethod, path: &str) -> String {
    let mut resources: Vec<(usize, &str)> = Vec::new();
    let mut versions: Vec<(usize, &str)> = Vec::new();
    let segments = path
        .split('/')
        .filter(|segment| !segment.is_empty() && !is_path_param_segment(segment));
    for (index, segment) in segments.enumerate() {
        if is_version_segment(segment) {
            versions.push((index, segment));
        } else {
            resources.push((index, segment));
        }
    }

    let Some(&(last_index, last)) = resources.last() else {
        return format!("{}Root", method.key());
    };

    let penultimate = resources.iter().rev().nth(1);
    let (stem, resource_index) = match (action_for(last), penultimate) {
        (Some(action), Some(&(index, resource))) => {
            (format!("{action}{}", segment_to_pascal(resource)), index)
        }
        _ => (
            format!("{}{}", verb_for(method), segment_to_pascal(last)),
            last_index,
        ),
    };

    let suffix: String = versions
        .iter()
        .filter(|(index, _)| *index > resource_index)
        .map(|(_, version)| segment_to_pascal(version))
        .collect();

    format!("{stem}{suffix}")
}
