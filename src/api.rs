use crate::config::MonitorConfig;
use crate::error::AppError;
use crate::models::{ModelsConfig, ProviderRecord, SystemStats, TestOutcome, TestRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub const PROVIDERS_PATH: &str = "admin/api/providers";
pub const STATS_PATH: &str = "admin/api/stats";
pub const MODELS_CONFIG_PATH: &str = "admin/api/models-config";
pub const TEST_PATH: &str = "admin/api/test";

/// The gateway's admin surface, as seen by the dashboard.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn fetch_providers(&self) -> Result<Vec<ProviderRecord>, AppError>;

    async fn fetch_stats(&self) -> Result<SystemStats, AppError>;

    async fn fetch_models_config(&self) -> Result<ModelsConfig, AppError>;

    /// `Ok` whenever the gateway answered with a test envelope, successful or
    /// not. `Err` only for transport failures and unreadable replies.
    async fn run_test(&self, request: &TestRequest) -> Result<TestOutcome, AppError>;
}

#[derive(Debug, Deserialize)]
struct ProvidersEnvelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    providers: Option<Vec<ProviderRecord>>,
}

#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    data: Option<SystemStats>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelsConfigEnvelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    models_config: Option<ModelsConfig>,
}

#[derive(Debug, Deserialize)]
struct TestEnvelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    duration: Option<u64>,
    #[serde(default)]
    response: Option<Value>,
}

impl TestEnvelope {
    fn into_outcome(self) -> Result<TestOutcome, AppError> {
        if !self.success {
            return Ok(TestOutcome::Failure {
                error: self.error.unwrap_or_else(|| "test request failed".into()),
                provider: self.provider.filter(|p| !p.is_empty()),
                duration_ms: self.duration,
            });
        }
        let body = match &self.response {
            Some(value) => serde_json::to_string_pretty(value)?,
            None => "null".to_string(),
        };
        Ok(TestOutcome::Success {
            provider: self.provider.unwrap_or_default(),
            model: self.model.unwrap_or_default(),
            duration_ms: self.duration.unwrap_or(0),
            body,
        })
    }
}

fn ensure_success<T>(
    success: bool,
    error: Option<String>,
    payload: Option<T>,
    what: &str,
) -> Result<T, AppError> {
    if !success {
        return Err(AppError::Api(
            error.unwrap_or_else(|| format!("failed to fetch {what}")),
        ));
    }
    payload.ok_or_else(|| AppError::Api(format!("gateway response is missing {what}")))
}

pub struct HttpAdminApi {
    client: Client,
    base: Url,
}

impl HttpAdminApi {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base: with_trailing_slash(base),
        })
    }

    pub fn from_config(cfg: &MonitorConfig) -> Result<Self, AppError> {
        Self::new(cfg.parsed_base_url()?, cfg.request_timeout())
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        Ok(self.base.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let url = self.endpoint(path)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                endpoint: format!("/{path}"),
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`,
/// which would drop a gateway mounted under a prefix.
fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn fetch_providers(&self) -> Result<Vec<ProviderRecord>, AppError> {
        let body: ProvidersEnvelope = self.get_json(PROVIDERS_PATH).await?;
        ensure_success(body.success, body.error, body.providers, "providers")
    }

    async fn fetch_stats(&self) -> Result<SystemStats, AppError> {
        let body: StatsEnvelope = self.get_json(STATS_PATH).await?;
        ensure_success(body.success, body.error, body.data, "system stats")
    }

    async fn fetch_models_config(&self) -> Result<ModelsConfig, AppError> {
        let body: ModelsConfigEnvelope = self.get_json(MODELS_CONFIG_PATH).await?;
        ensure_success(body.success, body.error, body.models_config, "models config")
    }

    async fn run_test(&self, request: &TestRequest) -> Result<TestOutcome, AppError> {
        let url = self.endpoint(TEST_PATH)?;
        let response = self.client.post(url).json(request).send().await?;
        let status = response.status();
        let raw = response.bytes().await?;

        // The gateway reports rejected tests (unknown provider, no capacity)
        // with a JSON envelope under a 4xx/5xx status.
        match serde_json::from_slice::<TestEnvelope>(&raw) {
            Ok(envelope) => envelope.into_outcome(),
            Err(_) if !status.is_success() => Err(AppError::Status {
                endpoint: format!("/{TEST_PATH}"),
                status: status.as_u16(),
            }),
            Err(err) => Err(AppError::Json(err)),
        }
    }
}
