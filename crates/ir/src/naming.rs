//! Identifier helpers shared by operation-id inference and schema synthesis.

use std::collections::HashSet;

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Convert a path segment to PascalCase (`bg-insurance` -> `BgInsurance`).
///
/// Splits on `-`, `.` and spaces; characters that cannot appear in an
/// identifier are dropped.
pub fn segment_to_pascal(segment: &str) -> String {
    segment
        .split(['-', '.', ' '])
        .map(|part| {
            let cleaned: String = part
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect();
            capitalize_first(&cleaned)
        })
        .collect()
}

/// Check for an API version marker segment (`v1`, `v2`, `v10`).
pub fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

/// Check for a pure path-parameter segment (`{petId}`).
pub fn is_path_param_segment(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// Reserve `base` in `taken`, appending 2, 3, ... until the name is free.
pub fn reserve_unique(base: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.to_string()) {
        return base.to_string();
    }
    let mut counter = 2usize;
    loop {
        let candidate = format!("{base}{counter}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}
