use crate::models::{ModelCatalogEntry, ModelsConfig};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Live,
    Fallback,
}

impl CatalogSource {
    pub fn as_label(self) -> &'static str {
        match self {
            CatalogSource::Live => "live",
            CatalogSource::Fallback => "built-in",
        }
    }
}

/// Models a provider can be tested with. The default is always one of
/// `models`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderModels {
    pub models: Vec<String>,
    pub default_model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    entries: HashMap<String, ProviderModels>,
    source: CatalogSource,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::fallback()
    }
}

impl ModelCatalog {
    pub fn from_live(config: ModelsConfig) -> Self {
        Self {
            entries: normalize_entries(config),
            source: CatalogSource::Live,
        }
    }

    pub fn fallback() -> Self {
        Self {
            entries: normalize_entries(built_in_models()),
            source: CatalogSource::Fallback,
        }
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    /// `None` means "no models available" for this key.
    pub fn models_for(&self, provider: &str) -> Option<&ProviderModels> {
        self.entries.get(provider)
    }
}

fn normalize_entries(config: ModelsConfig) -> HashMap<String, ProviderModels> {
    config
        .into_iter()
        .filter_map(|(provider, entry)| {
            let ModelCatalogEntry {
                models,
                default_model,
            } = entry;
            let first = models.first()?.clone();
            let default_model = default_model
                .filter(|d| models.iter().any(|m| m == d))
                .unwrap_or(first);
            Some((
                provider,
                ProviderModels {
                    models,
                    default_model,
                },
            ))
        })
        .collect()
}

fn entry(models: &[&str], default_model: &str) -> ModelCatalogEntry {
    ModelCatalogEntry {
        models: models.iter().map(|m| m.to_string()).collect(),
        default_model: Some(default_model.to_string()),
    }
}

pub fn built_in_models() -> ModelsConfig {
    HashMap::from([
        (
            "openai".to_string(),
            entry(
                &["gpt-3.5-turbo", "gpt-4o-2024-08-06", "gpt-4.1-2025-04-14"],
                "gpt-3.5-turbo",
            ),
        ),
        (
            "gemini".to_string(),
            entry(
                &[
                    "gemini-2.5-pro",
                    "gemini-2.5-flash",
                    "gemini-2.0-flash",
                    "gemini-1.5-flash",
                    "gemini-1.5-pro",
                ],
                "gemini-2.5-flash",
            ),
        ),
        (
            "deepseek".to_string(),
            entry(&["deepseek-reasoner", "deepseek-chat"], "deepseek-chat"),
        ),
        (
            "qwen".to_string(),
            entry(&["qwen-max", "qwen-plus", "qwq-plus"], "qwen-plus"),
        ),
        (
            "moonshot".to_string(),
            entry(
                &[
                    "moonshot-v1-8k",
                    "moonshot-v1-32k",
                    "moonshot-v1-128k",
                    "kimi-k2-0711-preview",
                ],
                "moonshot-v1-8k",
            ),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_covers_gateway_providers() {
        let catalog = ModelCatalog::fallback();
        assert_eq!(catalog.source(), CatalogSource::Fallback);
        for key in ["openai", "gemini", "deepseek", "qwen", "moonshot"] {
            let models = catalog.models_for(key).expect("fallback entry");
            assert!(models.models.contains(&models.default_model));
        }
        assert_eq!(
            catalog.models_for("deepseek").map(|m| m.default_model.as_str()),
            Some("deepseek-chat")
        );
    }

    #[test]
    fn absent_key_has_no_models() {
        assert!(ModelCatalog::fallback().models_for("anthropic").is_none());
    }

    #[test]
    fn live_entries_with_empty_lists_are_unavailable() {
        let catalog = ModelCatalog::from_live(HashMap::from([(
            "qwen".to_string(),
            ModelCatalogEntry {
                models: vec![],
                default_model: Some("qwen-plus".into()),
            },
        )]));
        assert!(catalog.models_for("qwen").is_none());
        assert_eq!(catalog.source(), CatalogSource::Live);
    }

    #[test]
    fn default_outside_model_list_falls_back_to_first() {
        let catalog = ModelCatalog::from_live(HashMap::from([
            (
                "openai".to_string(),
                ModelCatalogEntry {
                    models: vec!["gpt-4o".into(), "gpt-4o-mini".into()],
                    default_model: Some("gpt-3.5-turbo".into()),
                },
            ),
            (
                "gemini".to_string(),
                ModelCatalogEntry {
                    models: vec!["gemini-pro".into()],
                    default_model: None,
                },
            ),
        ]));
        assert_eq!(
            catalog.models_for("openai").map(|m| m.default_model.as_str()),
            Some("gpt-4o")
        );
        assert_eq!(
            catalog.models_for("gemini").map(|m| m.default_model.as_str()),
            Some("gemini-pro")
        );
    }
}
