use crate::error::AppError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const SERVICE_NAME: &str = "llm-monitor";

const MIN_REFRESH_SECONDS: u64 = 5;

pub fn normalize_provider_name(provider: &str) -> String {
    provider.trim().to_ascii_lowercase()
}

pub fn app_home_dir() -> Result<PathBuf, AppError> {
    if let Ok(custom) = std::env::var("LLM_MONITOR_HOME") {
        return Ok(PathBuf::from(custom));
    }

    if let Some(dirs) = ProjectDirs::from("com", "llm-bridge", SERVICE_NAME) {
        let candidate = dirs.data_local_dir().to_path_buf();
        if fs::create_dir_all(&candidate).is_ok() {
            return Ok(candidate);
        }
    }

    let cwd = std::env::current_dir()?;
    Ok(cwd.join(".llm-monitor"))
}

/// How the test form collects the model: picked from the gateway catalog, or
/// typed by hand with no catalog lookups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelInputMode {
    #[default]
    Catalog,
    FreeText,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    pub base_url: String,
    pub refresh_seconds: u64,
    pub request_timeout_seconds: u64,
    pub interaction_cooldown_ms: u64,
    pub model_input: ModelInputMode,
    pub pricing_overrides: Vec<PricingOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingOverride {
    pub provider: String,
    pub input_per_1k: f64,
    pub output_per_1k: f64,
    #[serde(default)]
    pub label: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".into(),
            refresh_seconds: 30,
            request_timeout_seconds: 30,
            interaction_cooldown_ms: 1000,
            model_input: ModelInputMode::Catalog,
            pricing_overrides: vec![],
        }
    }
}

impl MonitorConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_seconds.max(MIN_REFRESH_SECONDS))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.max(1))
    }

    pub fn interaction_cooldown(&self) -> Duration {
        Duration::from_millis(self.interaction_cooldown_ms)
    }

    pub fn parsed_base_url(&self) -> Result<Url, AppError> {
        let url = Url::parse(self.base_url.trim())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(url)
    }
}

pub fn config_dir() -> Result<PathBuf, AppError> {
    Ok(app_home_dir()?.join("config"))
}

pub fn log_dir() -> Result<PathBuf, AppError> {
    Ok(app_home_dir()?.join("logs"))
}

pub fn config_path() -> Result<PathBuf, AppError> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn ensure_dirs() -> Result<(), AppError> {
    fs::create_dir_all(config_dir()?)?;
    fs::create_dir_all(log_dir()?)?;
    Ok(())
}

fn normalize_config(config: &mut MonitorConfig) -> bool {
    let mut changed = false;

    let trimmed = config.base_url.trim().trim_end_matches('/').to_string();
    if trimmed != config.base_url {
        config.base_url = trimmed;
        changed = true;
    }

    let mut seen: Vec<String> = Vec::new();
    let before = config.pricing_overrides.len();
    config.pricing_overrides.retain_mut(|row| {
        let normalized = normalize_provider_name(&row.provider);
        if normalized != row.provider {
            row.provider = normalized.clone();
            changed = true;
        }
        if seen.contains(&normalized) {
            return false;
        }
        seen.push(normalized);
        true
    });
    if config.pricing_overrides.len() != before {
        changed = true;
    }

    changed
}

pub fn load_config_from(path: &Path) -> Result<MonitorConfig, AppError> {
    if !path.exists() {
        return Ok(MonitorConfig::default());
    }

    let raw = fs::read_to_string(path)?;
    let mut parsed: MonitorConfig = toml::from_str(&raw)?;
    if normalize_config(&mut parsed) {
        tracing::debug!(path = %path.display(), "normalized config on load");
    }
    parsed.parsed_base_url()?;
    Ok(parsed)
}

pub fn load_config() -> Result<MonitorConfig, AppError> {
    load_config_from(&config_path()?)
}

pub fn save_config(config: &MonitorConfig) -> Result<(), AppError> {
    ensure_dirs()?;
    let path = config_path()?;
    let raw = toml::to_string_pretty(config)?;
    fs::write(path, raw)?;
    Ok(())
}

pub fn ensure_initialized() -> Result<(), AppError> {
    ensure_dirs()?;
    let cfg_path = config_path()?;
    if !cfg_path.exists() {
        save_config(&MonitorConfig::default())?;
    }
    Ok(())
}
