use serde::{Deserialize, Serialize};

use super::RequestOutcome;

/// Result of a plain TCP connect against the target before dispatching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProbe {
    pub success: bool,
    pub host: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Durable record of one run, written once when every slot has finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Unix timestamp (seconds) at which the report was assembled.
    pub created: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_test: Option<ConnectionProbe>,
    pub requests: Vec<RequestOutcome>,
}

impl RunReport {
    #[must_use]
    pub fn new(requests: Vec<RequestOutcome>) -> Self {
        Self {
            created: chrono::Utc::now().timestamp(),
            connection_test: None,
            requests,
        }
    }

    #[must_use]
    pub fn with_connection_test(mut self, probe: Option<ConnectionProbe>) -> Self {
        self.connection_test = probe;
        self
    }
}
