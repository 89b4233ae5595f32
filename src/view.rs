use crate::catalog::ModelCatalog;
use crate::models::{ProviderRecord, ProviderStatus};
use std::cmp::Ordering;

pub const AUTO_SELECT_LABEL: &str = "Auto-select";
pub const SELECT_PROVIDER_FIRST: &str = "Select a provider first";
pub const NO_MODELS_AVAILABLE: &str = "No models available for this provider";

/// Display-ready provider list plus the summary counters. Rebuilt from the
/// raw records on every successful cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderView {
    providers: Vec<ProviderRecord>,
    total: usize,
    healthy: usize,
}

impl ProviderView {
    pub fn derive(mut records: Vec<ProviderRecord>) -> Self {
        sort_providers(&mut records);
        let total = records.len();
        let healthy = records
            .iter()
            .filter(|p| p.status == ProviderStatus::Healthy)
            .count();
        Self {
            providers: records,
            total,
            healthy,
        }
    }

    pub fn providers(&self) -> &[ProviderRecord] {
        &self.providers
    }

    pub fn total_providers(&self) -> usize {
        self.total
    }

    pub fn healthy_providers(&self) -> usize {
        self.healthy
    }

    pub fn find(&self, name: &str) -> Option<&ProviderRecord> {
        self.providers.iter().find(|p| p.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.providers.iter().position(|p| p.name == name)
    }
}

fn compare_providers(a: &ProviderRecord, b: &ProviderRecord) -> Ordering {
    b.requests
        .cmp(&a.requests)
        .then_with(|| a.name.cmp(&b.name))
}

/// Busiest first; equal request counts fall back to byte-wise name order.
pub fn sort_providers(records: &mut [ProviderRecord]) {
    records.sort_by(compare_providers);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderChoice {
    Auto,
    Named(String),
}

impl ProviderChoice {
    /// Wire value sent to the test endpoint; empty lets the gateway pick.
    pub fn value(&self) -> &str {
        match self {
            ProviderChoice::Auto => "",
            ProviderChoice::Named(name) => name,
        }
    }

    pub fn label(&self) -> String {
        match self {
            ProviderChoice::Auto => AUTO_SELECT_LABEL.to_string(),
            ProviderChoice::Named(name) => name.to_uppercase(),
        }
    }
}

pub fn provider_options(view: &ProviderView) -> Vec<ProviderChoice> {
    std::iter::once(ProviderChoice::Auto)
        .chain(
            view.providers()
                .iter()
                .map(|p| ProviderChoice::Named(p.name.clone())),
        )
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOption {
    pub value: String,
    pub recommended: bool,
}

impl ModelOption {
    pub fn label(&self) -> String {
        if self.recommended {
            format!("{} (recommended)", self.value)
        } else {
            self.value.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOptions {
    Available {
        options: Vec<ModelOption>,
        default_index: usize,
    },
    Disabled {
        placeholder: &'static str,
    },
}

impl Default for ModelOptions {
    fn default() -> Self {
        ModelOptions::Disabled {
            placeholder: SELECT_PROVIDER_FIRST,
        }
    }
}

impl ModelOptions {
    pub fn options(&self) -> &[ModelOption] {
        match self {
            ModelOptions::Available { options, .. } => options,
            ModelOptions::Disabled { .. } => &[],
        }
    }
}

pub fn model_options(catalog: &ModelCatalog, choice: &ProviderChoice) -> ModelOptions {
    let ProviderChoice::Named(name) = choice else {
        return ModelOptions::default();
    };
    let Some(entry) = catalog.models_for(name) else {
        return ModelOptions::Disabled {
            placeholder: NO_MODELS_AVAILABLE,
        };
    };

    let options: Vec<ModelOption> = entry
        .models
        .iter()
        .map(|m| ModelOption {
            value: m.clone(),
            recommended: *m == entry.default_model,
        })
        .collect();
    let default_index = options.iter().position(|o| o.recommended).unwrap_or(0);
    ModelOptions::Available {
        options,
        default_index,
    }
}
