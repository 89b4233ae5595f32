use crate::config::PricingOverride;
use crate::invoker::TestPanel;
use crate::models::{metric_or_placeholder, ProviderRecord, RateLimitInfo, SystemStats, TestOutcome};
use crate::pricing::estimate_cost;

pub const ESTIMATE_DISCLAIMER: &str =
    "Estimate only. Check each provider's billing for actual charges.";

pub type Rows = Vec<(&'static str, String)>;

fn plain_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

fn millis(value: f64) -> String {
    format!("{}ms", plain_number(value))
}

pub fn provider_detail_rows(provider: &ProviderRecord) -> Rows {
    let models = if provider.models.is_empty() {
        "--".to_string()
    } else {
        provider.models.join(", ")
    };
    vec![
        ("Status", provider.status.as_label().to_string()),
        (
            "Base URL",
            provider
                .base_url
                .clone()
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| "N/A".into()),
        ),
        ("Timeout", format!("{}s", plain_number(provider.timeout))),
        ("Retries", provider.retries.to_string()),
        ("Requests", provider.requests.to_string()),
        ("Avg response", millis(provider.avg_response_time)),
        ("Tokens", provider.tokens.to_string()),
        ("Models", models),
    ]
}

pub fn cost_rows(provider: &ProviderRecord, overrides: &[PricingOverride]) -> Rows {
    let estimate = estimate_cost(&provider.name, provider.tokens, overrides);
    vec![
        ("Estimated cost", format!("${}", estimate.estimated_cost)),
        ("Pricing model", estimate.pricing_model),
        ("Total tokens", provider.tokens.to_string()),
        ("Requests", provider.requests.to_string()),
        (
            "Avg tokens/request",
            provider.avg_tokens_per_request().to_string(),
        ),
        ("Avg response", millis(provider.avg_response_time)),
        ("Status", provider.status.as_label().to_string()),
    ]
}

pub fn stats_rows(stats: &SystemStats) -> Rows {
    let metrics = &stats.metrics;
    vec![
        (
            "Version",
            stats
                .service
                .version
                .clone()
                .unwrap_or_else(|| "v1.0.0".into()),
        ),
        (
            "Uptime",
            stats.service.uptime.clone().unwrap_or_else(|| "--".into()),
        ),
        (
            "Connections",
            metric_or_placeholder(metrics.active_connections.as_ref()),
        ),
        ("Memory", metric_or_placeholder(metrics.memory_usage.as_ref())),
        ("CPU", metric_or_placeholder(metrics.cpu_usage.as_ref())),
    ]
}

/// `None` when the gateway reports no rate limiting section at all.
pub fn rate_limit_rows(info: Option<&RateLimitInfo>) -> Option<Rows> {
    let info = info?;
    if !info.enabled {
        return Some(vec![
            ("Rate limit", "disabled".into()),
            ("Per 1m", "--".into()),
            ("Per 5m", "--".into()),
        ]);
    }
    let (one, five) = match info.config {
        Some(windows) => (
            format!("{} req/min", windows.window_1m),
            format!("{} req/5min", windows.window_5m),
        ),
        None => ("--".into(), "--".into()),
    };
    Some(vec![
        ("Rate limit", "enabled".into()),
        ("Per 1m", one),
        ("Per 5m", five),
    ])
}

pub fn test_output_lines(panel: &TestPanel) -> Vec<String> {
    match panel {
        TestPanel::Idle => vec!["No test run yet. Fill the form and press Enter.".into()],
        TestPanel::Running { provider } => {
            let target = if provider.is_empty() {
                "auto-selected provider"
            } else {
                provider.as_str()
            };
            vec![format!("Sending test request to {target}...")]
        }
        TestPanel::Done(TestOutcome::Success {
            provider,
            model,
            duration_ms,
            body,
        }) => {
            let mut lines = vec![
                "Test succeeded".to_string(),
                format!("Provider: {provider}"),
                format!("Model: {model}"),
                format!("Duration: {duration_ms}ms"),
                String::new(),
            ];
            lines.extend(body.lines().map(str::to_string));
            lines
        }
        TestPanel::Done(TestOutcome::Failure {
            error,
            provider,
            duration_ms,
        }) => vec![
            "Test failed".to_string(),
            format!("Error: {error}"),
            format!("Provider: {}", provider.as_deref().unwrap_or("N/A")),
            format!("Duration: {}ms", duration_ms.unwrap_or(0)),
        ],
        TestPanel::Done(TestOutcome::NetworkError { error }) => {
            vec!["Network error".to_string(), error.clone()]
        }
    }
}
