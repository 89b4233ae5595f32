use crate::config::PricingOverride;
use serde::{Deserialize, Serialize};

/// Share of a provider's token total assumed to be input. Not measured.
const INPUT_SHARE: f64 = 0.6;
const OUTPUT_SHARE: f64 = 0.4;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderPricing {
    pub provider: String,
    pub input_per_1k: f64,
    pub output_per_1k: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostEstimate {
    pub estimated_cost: String,
    pub pricing_model: String,
}

pub fn built_in_pricing() -> Vec<ProviderPricing> {
    vec![
        ProviderPricing {
            provider: "openai".into(),
            input_per_1k: 0.001,
            output_per_1k: 0.002,
            label: "GPT-3.5-turbo".into(),
        },
        ProviderPricing {
            provider: "gemini".into(),
            input_per_1k: 0.0005,
            output_per_1k: 0.0015,
            label: "Gemini Pro".into(),
        },
        ProviderPricing {
            provider: "deepseek".into(),
            input_per_1k: 0.0002,
            output_per_1k: 0.0006,
            label: "DeepSeek Chat".into(),
        },
        ProviderPricing {
            provider: "qwen".into(),
            input_per_1k: 0.0008,
            output_per_1k: 0.0024,
            label: "Qwen".into(),
        },
        ProviderPricing {
            provider: "moonshot".into(),
            input_per_1k: 0.0024,
            output_per_1k: 0.0072,
            label: "Moonshot v1".into(),
        },
    ]
}

fn generic_pricing(provider: &str) -> ProviderPricing {
    ProviderPricing {
        provider: provider.to_string(),
        input_per_1k: 0.001,
        output_per_1k: 0.002,
        label: "Unknown model".into(),
    }
}

pub fn resolve_pricing(provider: &str, overrides: &[PricingOverride]) -> ProviderPricing {
    if let Some(ov) = overrides
        .iter()
        .find(|ov| ov.provider.eq_ignore_ascii_case(provider))
    {
        return ProviderPricing {
            provider: provider.to_string(),
            input_per_1k: ov.input_per_1k,
            output_per_1k: ov.output_per_1k,
            label: ov.label.clone().unwrap_or_else(|| "Custom pricing".into()),
        };
    }

    built_in_pricing()
        .into_iter()
        .find(|p| p.provider.eq_ignore_ascii_case(provider))
        .unwrap_or_else(|| generic_pricing(provider))
}

/// Rough spend for `total_tokens` under a fixed 60/40 input/output split.
/// This is an estimate for display, never a billing figure.
pub fn estimate_cost(
    provider: &str,
    total_tokens: u64,
    overrides: &[PricingOverride],
) -> CostEstimate {
    let pricing = resolve_pricing(provider, overrides);
    let tokens = total_tokens as f64;
    let input_tokens = tokens * INPUT_SHARE;
    let output_tokens = tokens * OUTPUT_SHARE;
    let cost = input_tokens / 1000.0 * pricing.input_per_1k
        + output_tokens / 1000.0 * pricing.output_per_1k;

    CostEstimate {
        estimated_cost: format!("{cost:.4}"),
        pricing_model: pricing.label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_thousand_tokens_costs_fourteen_ten_thousandths() {
        let estimate = estimate_cost("openai", 1000, &[]);
        assert_eq!(estimate.estimated_cost, "0.0014");
        assert_eq!(estimate.pricing_model, "GPT-3.5-turbo");
    }

    #[test]
    fn unknown_provider_uses_generic_entry() {
        let estimate = estimate_cost("mystery", 1000, &[]);
        assert_eq!(estimate.estimated_cost, "0.0014");
        assert_eq!(estimate.pricing_model, "Unknown model");
    }

    #[test]
    fn zero_tokens_cost_nothing() {
        assert_eq!(estimate_cost("moonshot", 0, &[]).estimated_cost, "0.0000");
    }

    #[test]
    fn moonshot_uses_its_own_rates() {
        // 600 * 0.0024 / 1000 + 400 * 0.0072 / 1000
        assert_eq!(estimate_cost("moonshot", 1000, &[]).estimated_cost, "0.0043");
    }

    #[test]
    fn overrides_take_precedence_over_built_in_table() {
        let overrides = vec![PricingOverride {
            provider: "openai".into(),
            input_per_1k: 0.01,
            output_per_1k: 0.03,
            label: Some("GPT-4o".into()),
        }];
        let estimate = estimate_cost("OpenAI", 1000, &overrides);
        // 600 * 0.01 / 1000 + 400 * 0.03 / 1000
        assert_eq!(estimate.estimated_cost, "0.0180");
        assert_eq!(estimate.pricing_model, "GPT-4o");
    }
}
