use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Healthy,
    Unhealthy,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ProviderStatus {
    pub fn as_label(self) -> &'static str {
        match self {
            ProviderStatus::Healthy => "healthy",
            ProviderStatus::Unhealthy => "unhealthy",
            ProviderStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    pub name: String,
    #[serde(default)]
    pub status: ProviderStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub models: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requests: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tokens: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_response_time: f64,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timeout: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub retries: u32,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_test: Option<DateTime<Utc>>,
}

impl ProviderRecord {
    pub fn display_name(&self) -> String {
        self.name.to_uppercase()
    }

    pub fn usage_badge(&self) -> Option<&'static str> {
        if self.requests > 10 {
            Some("hot")
        } else if self.requests > 0 {
            Some("active")
        } else {
            None
        }
    }

    pub fn avg_tokens_per_request(&self) -> u64 {
        if self.requests == 0 {
            return 0;
        }
        (self.tokens as f64 / self.requests as f64).round() as u64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModelCatalogEntry {
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub default_model: Option<String>,
}

pub type ModelsConfig = HashMap<String, ModelCatalogEntry>;

/// A metric the gateway reports either as a number or as preformatted text
/// (`"12.3 MB"`, `"0%"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    fn is_blank(&self) -> bool {
        match self {
            MetricValue::Number(n) => *n == 0.0,
            MetricValue::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            MetricValue::Number(n) => write!(f, "{n:.2}"),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

pub fn metric_or_placeholder(value: Option<&MetricValue>) -> String {
    match value {
        Some(v) if !v.is_blank() => v.to_string(),
        _ => "--".to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SystemMetrics {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_requests: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_response_time: f64,
    #[serde(default)]
    pub active_connections: Option<MetricValue>,
    #[serde(default)]
    pub memory_usage: Option<MetricValue>,
    #[serde(default)]
    pub cpu_usage: Option<MetricValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ServiceInfo {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uptime: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RateLimitWindows {
    #[serde(default)]
    pub window_1m: u64,
    #[serde(default)]
    pub window_5m: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RateLimitInfo {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub config: Option<RateLimitWindows>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SystemStats {
    #[serde(default)]
    pub metrics: SystemMetrics,
    #[serde(default)]
    pub service: ServiceInfo,
    #[serde(default)]
    pub rate_limit: Option<RateLimitInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestRequest {
    pub provider: String,
    pub model: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TestOutcome {
    Success {
        provider: String,
        model: String,
        duration_ms: u64,
        body: String,
    },
    Failure {
        error: String,
        provider: Option<String>,
        duration_ms: Option<u64>,
    },
    NetworkError {
        error: String,
    },
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(parse_timestamp))
}

/// Accepts epoch seconds or RFC 3339 text; anything else is treated as absent.
pub fn parse_timestamp(raw: &Value) -> Option<DateTime<Utc>> {
    if let Some(secs) = raw.as_i64() {
        return Utc.timestamp_opt(secs, 0).single();
    }
    if let Some(text) = raw.as_str() {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_timestamp_supports_epoch_seconds() {
        let ts = parse_timestamp(&json!(1_700_000_000)).expect("timestamp should parse");
        assert_eq!(ts.timestamp(), 1_700_000_000);
    }

    #[test]
    fn parse_timestamp_supports_rfc3339() {
        let ts = parse_timestamp(&json!("2024-01-01T00:00:00Z")).expect("timestamp should parse");
        assert_eq!(ts.timestamp(), 1_704_067_200);
    }

    #[test]
    fn parse_timestamp_returns_none_for_invalid_payload() {
        assert!(parse_timestamp(&json!("nope")).is_none());
        assert!(parse_timestamp(&json!({})).is_none());
    }

    #[test]
    fn provider_record_tolerates_missing_and_null_fields() {
        let record: ProviderRecord = serde_json::from_value(json!({
            "name": "openai",
            "status": "degraded",
            "models": null,
            "requests": null,
            "baseUrl": "https://api.openai.com",
            "lastTest": null
        }))
        .expect("parse provider");

        assert_eq!(record.status, ProviderStatus::Unknown);
        assert!(record.models.is_empty());
        assert_eq!(record.requests, 0);
        assert_eq!(record.tokens, 0);
        assert_eq!(record.base_url.as_deref(), Some("https://api.openai.com"));
        assert!(record.last_test.is_none());
    }

    #[test]
    fn usage_badge_follows_request_thresholds() {
        let mut record: ProviderRecord =
            serde_json::from_value(json!({ "name": "qwen" })).expect("parse provider");
        assert_eq!(record.usage_badge(), None);
        record.requests = 10;
        assert_eq!(record.usage_badge(), Some("active"));
        record.requests = 11;
        assert_eq!(record.usage_badge(), Some("hot"));
    }

    #[test]
    fn avg_tokens_per_request_rounds_and_handles_zero() {
        let mut record: ProviderRecord =
            serde_json::from_value(json!({ "name": "gemini", "tokens": 10 })).expect("parse");
        assert_eq!(record.avg_tokens_per_request(), 0);
        record.requests = 3;
        assert_eq!(record.avg_tokens_per_request(), 3);
        record.requests = 4;
        assert_eq!(record.avg_tokens_per_request(), 3);
    }

    #[test]
    fn stats_accept_textual_and_numeric_metrics() {
        let stats: SystemStats = serde_json::from_value(json!({
            "metrics": {
                "total_requests": 42,
                "avg_response_time": 120,
                "active_connections": 0,
                "memory_usage": "12.3 MB",
                "cpu_usage": "0%"
            },
            "service": { "version": "v1.0.0", "uptime": "5m", "port": 8080 }
        }))
        .expect("parse stats");

        assert_eq!(stats.metrics.total_requests, 42);
        assert_eq!(
            metric_or_placeholder(stats.metrics.active_connections.as_ref()),
            "--"
        );
        assert_eq!(
            metric_or_placeholder(stats.metrics.memory_usage.as_ref()),
            "12.3 MB"
        );
        assert!(stats.rate_limit.is_none());
    }
}
