use std::time::Duration;

use serde::Deserialize;

use crate::error::ValidationError;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub token: Option<String>,
    pub headers: Option<Vec<String>>,
    /// Inline request body; TOML tables and JSON objects both work.
    pub payload: Option<serde_json::Value>,
    pub data_file: Option<String>,
    #[serde(alias = "count")]
    pub requests: Option<usize>,
    pub stagger: Option<StaggerConfig>,
    pub retries: Option<u32>,
    pub backoff: Option<Vec<DurationValue>>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub output: Option<String>,
    pub transient: Option<TransientConfig>,
    pub preview_chars: Option<usize>,
    pub probe: Option<bool>,
    pub probe_timeout: Option<DurationValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaggerConfig {
    pub min: Option<DurationValue>,
    pub max: Option<DurationValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransientConfig {
    pub code: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    /// Interprets the value as a timeout, which must be non-zero.
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => super::parse_duration_value(text),
        }
    }

    /// Interprets the value as a wait, where zero means "no wait".
    pub(crate) fn to_delay(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => super::parse_delay_value(text),
        }
    }
}
