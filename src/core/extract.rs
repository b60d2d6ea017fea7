//! Extraction of model names, sizes, and parameter counts from daemon responses.
//!
//! Bodies are semi-trusted: they may be truncated, an HTML error page, or empty.
//! A body in the documented `{"models":[...]}` shape is read with serde; anything else
//! goes through a tolerant pattern scan. Neither path fails; bad input yields fewer entries.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::core::models::ModelInfo;

/// Every `"name":"<value>"` occurrence. The value may contain escaped characters.
static NAME_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""name"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("valid name pattern")
});

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    models: Vec<WireModel>,
}

#[derive(Deserialize)]
struct WireModel {
    #[serde(default)]
    name: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    details: WireDetails,
}

#[derive(Deserialize, Default)]
struct WireDetails {
    #[serde(default)]
    parameter_size: String,
}

/// Extract the model catalog from a `/api/tags` body.
///
/// First occurrence of each distinct name wins; missing size / parameter size default to
/// `0` / `""`.
pub fn extract_catalog(body: &str) -> Vec<ModelInfo> {
    if let Some(models) = parse_list(body) {
        let mut seen = HashSet::new();
        return models
            .into_iter()
            .filter(|m| !m.name.is_empty() && seen.insert(m.name.clone()))
            .map(|m| ModelInfo::new(m.name, m.size, m.details.parameter_size))
            .collect();
    }

    scan_names(body)
        .into_iter()
        .map(|(name, start)| {
            let scope = &body[start..];
            let size = scoped_field(scope, &name, r#""size"\s*:\s*(\d+)"#)
                .and_then(|s| s.parse().ok())
                .unwrap_or(0);
            let parameter_size =
                scoped_field(scope, &name, r#""parameter_size"\s*:\s*"([^"]*)""#)
                    .unwrap_or_default();
            ModelInfo::new(name, size, parameter_size)
        })
        .collect()
}

/// Extract loaded model names from a `/api/ps` body, first-seen order, no duplicates.
pub fn extract_running_names(body: &str) -> Vec<String> {
    if let Some(models) = parse_list(body) {
        let mut seen = HashSet::new();
        return models
            .into_iter()
            .filter(|m| !m.name.is_empty() && seen.insert(m.name.clone()))
            .map(|m| m.name)
            .collect();
    }
    scan_names(body).into_iter().map(|(name, _)| name).collect()
}

/// Structured read. `None` when the body is not the documented shape or lists nothing.
fn parse_list(body: &str) -> Option<Vec<WireModel>> {
    let parsed: ListResponse = serde_json::from_str(body).ok()?;
    if parsed.models.is_empty() {
        None
    } else {
        Some(parsed.models)
    }
}

/// Distinct non-empty names with the byte offset of their first occurrence.
fn scan_names(body: &str) -> Vec<(String, usize)> {
    let mut seen = HashSet::new();
    NAME_FIELD
        .captures_iter(body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let value = caps.get(1)?.as_str();
            if value.is_empty() || !seen.insert(value.to_string()) {
                return None;
            }
            Some((value.to_string(), whole.start()))
        })
        .collect()
}

/// Find `field_pattern` after the literal `"name":"<name>"` without leaving the enclosing
/// object. The name is escaped so `.`, `+`, `:` and friends match literally.
fn scoped_field(scope: &str, name: &str, field_pattern: &str) -> Option<String> {
    let pattern = format!(
        r#""name"\s*:\s*"{}"[^}}]*?{}"#,
        regex::escape(name),
        field_pattern
    );
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            log::debug!("Skipping field lookup for {}: {}", name, e);
            return None;
        }
    };
    re.captures(scope)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGS_BODY: &str = r#"{"models":[{"name":"llama3.2:latest","model":"llama3.2:latest","modified_at":"2024-10-01T10:00:00Z","size":2019393189,"digest":"a80c4f17acd5","details":{"parent_model":"","format":"gguf","family":"llama","families":["llama"],"parameter_size":"3.2B","quantization_level":"Q4_K_M"}},{"name":"mistral:7b","model":"mistral:7b","size":4113301824,"details":{"parameter_size":"7.2B"}}]}"#;

    #[test]
    fn catalog_from_documented_shape() {
        let models = extract_catalog(TAGS_BODY);
        assert_eq!(
            models,
            vec![
                ModelInfo::new("llama3.2:latest", 2_019_393_189, "3.2B"),
                ModelInfo::new("mistral:7b", 4_113_301_824, "7.2B"),
            ]
        );
    }

    #[test]
    fn catalog_from_bare_object() {
        let models = extract_catalog(r#"{"name":"llama3.2:latest","size":4000000000}"#);
        assert_eq!(
            models,
            vec![ModelInfo::new("llama3.2:latest", 4_000_000_000, "")]
        );
    }

    #[test]
    fn catalog_from_truncated_body_keeps_complete_prefix() {
        let cut = TAGS_BODY
            .find(r#""details":{"parameter_size":"7.2B""#)
            .expect("fixture contains second details block");
        let models = extract_catalog(&TAGS_BODY[..cut]);
        assert_eq!(
            models,
            vec![
                ModelInfo::new("llama3.2:latest", 2_019_393_189, "3.2B"),
                ModelInfo::new("mistral:7b", 4_113_301_824, ""),
            ]
        );
    }

    #[test]
    fn missing_fields_default() {
        let models = extract_catalog(r#"[{"name":"phi3"}, {"name":"gemma2","size":12}"#);
        assert_eq!(
            models,
            vec![ModelInfo::new("phi3", 0, ""), ModelInfo::new("gemma2", 12, "")]
        );
    }

    #[test]
    fn fields_do_not_leak_from_next_entry() {
        let body = r#"[{"name":"a"},{"name":"b","size":99,"parameter_size":"1B"}]"#;
        let models = extract_catalog(body);
        assert_eq!(models[0], ModelInfo::new("a", 0, ""));
        assert_eq!(models[1], ModelInfo::new("b", 99, "1B"));
    }

    #[test]
    fn special_characters_in_name_are_matched_literally() {
        let body = r#"[{"name":"axb","size":1},{"name":"a.b","size":42},{"name":"c+d:1-2","size":7}"#;
        let models = extract_catalog(body);
        assert_eq!(models[1], ModelInfo::new("a.b", 42, ""));
        assert_eq!(models[2], ModelInfo::new("c+d:1-2", 7, ""));
    }

    #[test]
    fn duplicate_names_keep_first_occurrence() {
        let body = r#"[{"name":"x","size":1},{"name":"y"},{"name":"x","size":2}"#;
        let models = extract_catalog(body);
        assert_eq!(models, vec![ModelInfo::new("x", 1, ""), ModelInfo::new("y", 0, "")]);

        let structured = r#"{"models":[{"name":"x","size":1},{"name":"y"},{"name":"x","size":2}]}"#;
        assert_eq!(extract_catalog(structured), models);
    }

    #[test]
    fn garbage_bodies_yield_nothing() {
        assert!(extract_catalog("").is_empty());
        assert!(extract_catalog("<html><body>502 Bad Gateway</body></html>").is_empty());
        assert!(extract_catalog(r#"{"models":[]}"#).is_empty());
        assert!(extract_running_names("{\"na").is_empty());
    }

    #[test]
    fn running_names_in_first_seen_order() {
        let body = r#"{"models":[{"name":"llama3.2:latest","model":"llama3.2:latest"},{"name":"phi3:mini"},{"name":"llama3.2:latest"}]}"#;
        assert_eq!(
            extract_running_names(body),
            vec!["llama3.2:latest".to_string(), "phi3:mini".to_string()]
        );
    }

    #[test]
    fn running_names_from_bare_object() {
        assert_eq!(
            extract_running_names(r#"{"name":"llama3.2:latest"}"#),
            vec!["llama3.2:latest".to_string()]
        );
    }
}
