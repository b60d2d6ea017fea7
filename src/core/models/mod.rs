//! Model catalog entries, labels, and filtering.

mod info;

pub use info::{ModelInfo, format_size};

use crate::core::util;

/// Filter models by fuzzy query on the model name. Parameter and size details do not match.
pub fn filter_models<'a>(models: &'a [ModelInfo], query: &str) -> Vec<&'a ModelInfo> {
    util::filter_by_query(models, query, |m| m.name.as_str())
}

/// Strip the tag suffix at the first ':' ("llama3.2:latest" -> "llama3.2").
pub fn display_name(name: &str) -> &str {
    name.split_once(':').map(|(base, _)| base).unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_strips_tag() {
        assert_eq!(display_name("llama3.2:latest"), "llama3.2");
        assert_eq!(display_name("qwen2.5:7b-instruct"), "qwen2.5");
    }

    #[test]
    fn display_name_without_tag_is_unchanged() {
        assert_eq!(display_name("mistral"), "mistral");
    }

    #[test]
    fn filter_models_is_fuzzy() {
        let models = vec![
            ModelInfo::new("llama3.2:latest", 0, ""),
            ModelInfo::new("mistral:7b", 0, ""),
        ];
        let out = filter_models(&models, "l32");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "llama3.2:latest");
    }

    #[test]
    fn filter_models_ignores_label_details() {
        let models = vec![ModelInfo::new("mistral:7b", 4_113_301_824, "7.2B")];
        assert!(models[0].label().contains("7.2B"));
        assert!(filter_models(&models, "7.2B").is_empty());
        assert_eq!(filter_models(&models, "7b").len(), 1);
    }
}
