mod api;
mod catalog;
mod clock;
mod config;
mod controller;
mod error;
mod form;
mod guard;
mod invoker;
mod logging;
mod models;
mod pricing;
mod ui;
mod view;

use api::{AdminApi, HttpAdminApi};
use clap::{Parser, Subcommand};
use clock::SystemClock;
use config::{ensure_initialized, load_config, normalize_provider_name, MonitorConfig};
use controller::{RefreshController, RefreshOutcome};
use error::AppError;
use invoker::TestInvoker;
use models::TestOutcome;
use pricing::estimate_cost;
use std::sync::Arc;
use ui::panels::{rate_limit_rows, stats_rows, test_output_lines, ESTIMATE_DISCLAIMER};
use ui::run::run_tui;

#[derive(Debug, Parser)]
#[command(name = "llm-monitor")]
#[command(about = "Operations dashboard for an LLM gateway")]
struct Cli {
    /// Gateway base URL for this run, overriding the config file.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Init,
    Tui,
    Refresh {
        #[arg(long, default_value = "text")]
        format: String,
    },
    Test {
        /// Leave empty to let the gateway pick a provider.
        #[arg(long, default_value = "")]
        provider: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        message: String,
    },
    Cost {
        provider: String,
        /// Token count to price; fetched from the gateway when omitted.
        #[arg(long)]
        tokens: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn validate_format(input: &str) -> Result<OutputFormat, AppError> {
    if input.eq_ignore_ascii_case("text") {
        Ok(OutputFormat::Text)
    } else if input.eq_ignore_ascii_case("json") {
        Ok(OutputFormat::Json)
    } else {
        Err(AppError::Config(
            "Unsupported format. Use text or json.".into(),
        ))
    }
}

fn apply_base_url(mut cfg: MonitorConfig, base_url: Option<String>) -> Result<MonitorConfig, AppError> {
    if let Some(url) = base_url {
        cfg.base_url = url.trim().trim_end_matches('/').to_string();
        cfg.parsed_base_url()?;
    }
    Ok(cfg)
}

fn load_effective_config(base_url: Option<String>) -> Result<MonitorConfig, AppError> {
    ensure_initialized()?;
    apply_base_url(load_config()?, base_url)
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let _log_guard = if matches!(cli.command, Commands::Tui) {
        Some(logging::init_file_logging()?)
    } else {
        logging::init_stderr_logging();
        None
    };

    match cli.command {
        Commands::Init => {
            ensure_initialized()?;
            println!("Initialized llm-monitor config and log directories.");
        }
        Commands::Tui => {
            let cfg = load_effective_config(cli.base_url)?;
            run_tui(cfg).await?;
        }
        Commands::Refresh { format } => {
            let format = validate_format(&format)?;
            let cfg = load_effective_config(cli.base_url)?;
            let api = Arc::new(HttpAdminApi::from_config(&cfg)?);
            let mut controller = RefreshController::new(api, Arc::new(SystemClock), &cfg);

            if let RefreshOutcome::Failed(message) = controller.refresh(true).await {
                return Err(AppError::Api(message));
            }
            print_refresh(&controller, format)?;
        }
        Commands::Test {
            provider,
            model,
            message,
        } => {
            let cfg = load_effective_config(cli.base_url)?;
            let api = HttpAdminApi::from_config(&cfg)?;
            let provider = normalize_provider_name(&provider);
            let mut invoker = TestInvoker::default();
            let outcome = invoker.run_test(&api, &provider, &model, &message).await?;

            for line in test_output_lines(invoker.panel()) {
                println!("{line}");
            }
            match outcome {
                TestOutcome::Success { .. } => {}
                TestOutcome::Failure { error, .. } | TestOutcome::NetworkError { error } => {
                    return Err(AppError::Api(error));
                }
            }
        }
        Commands::Cost { provider, tokens } => {
            let cfg = load_effective_config(cli.base_url)?;
            let provider = normalize_provider_name(&provider);
            let tokens = match tokens {
                Some(tokens) => tokens,
                None => {
                    let api = HttpAdminApi::from_config(&cfg)?;
                    api.fetch_providers()
                        .await?
                        .into_iter()
                        .find(|p| p.name.eq_ignore_ascii_case(&provider))
                        .map(|p| p.tokens)
                        .ok_or_else(|| {
                            AppError::Api(format!("provider not reported by gateway: {provider}"))
                        })?
                }
            };

            let estimate = estimate_cost(&provider, tokens, &cfg.pricing_overrides);
            println!("Provider: {provider}");
            println!("Pricing model: {}", estimate.pricing_model);
            println!("Tokens: {tokens}");
            println!("Estimated cost: ${}", estimate.estimated_cost);
            println!("{ESTIMATE_DISCLAIMER}");
        }
    }

    Ok(())
}

fn print_refresh(controller: &RefreshController, format: OutputFormat) -> Result<(), AppError> {
    let state = controller.state();
    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "providers": state.view.providers(),
                "totalProviders": state.view.total_providers(),
                "healthyProviders": state.view.healthy_providers(),
                "stats": state.stats,
                "catalog": state.catalog.source().as_label(),
                "refreshedAt": state.last_refresh.map(|ts| ts.to_rfc3339()),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            println!(
                "Providers: {} total, {} healthy (catalog: {})",
                state.view.total_providers(),
                state.view.healthy_providers(),
                state.catalog.source().as_label()
            );
            for p in state.view.providers() {
                println!(
                    "  {:<12} {:<10} {:>8} req {:>10} tok {:>7.0}ms  {}",
                    p.display_name(),
                    p.status.as_label(),
                    p.requests,
                    p.tokens,
                    p.avg_response_time,
                    p.usage_badge().unwrap_or("")
                );
            }
            if let Some(stats) = &state.stats {
                println!(
                    "Requests: {}  avg response {:.0}ms",
                    stats.metrics.total_requests, stats.metrics.avg_response_time
                );
                let rows = stats_rows(stats)
                    .into_iter()
                    .chain(rate_limit_rows(stats.rate_limit.as_ref()).unwrap_or_default());
                for (label, value) in rows {
                    println!("{label}: {value}");
                }
            }
            println!("Last refresh: {}", state.last_refresh_label());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_format_accepts_known_values() {
        assert_eq!(validate_format("text").expect("text"), OutputFormat::Text);
        assert_eq!(validate_format("JSON").expect("json"), OutputFormat::Json);
    }

    #[test]
    fn validate_format_rejects_unknown_values() {
        let err = validate_format("csv").expect_err("expected validation error");
        assert!(err.to_string().contains("Unsupported format"));
    }

    #[test]
    fn base_url_override_replaces_config_value() {
        let cfg = apply_base_url(
            MonitorConfig::default(),
            Some("https://gateway.internal:9000/".into()),
        )
        .expect("override");
        assert_eq!(cfg.base_url, "https://gateway.internal:9000");

        let untouched = apply_base_url(MonitorConfig::default(), None).expect("no override");
        assert_eq!(untouched.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn base_url_override_must_be_a_url() {
        assert!(apply_base_url(MonitorConfig::default(), Some("not a url".into())).is_err());
    }
}
