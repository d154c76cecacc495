use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Error text recorded when every attempt hit the transient signature.
pub(crate) const EXHAUSTED_RETRIES: &str = "exhausted retries";
/// Error text recorded when a sub-400 response could not be decoded as JSON.
pub(crate) const NON_JSON_RESPONSE: &str = "non-JSON response";

const EXCEPTION_SENTINEL: &str = "exception";

/// Either the HTTP status of the last response, or `"exception"` when no
/// usable response was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Http(u16),
    Exception,
}

impl OutcomeStatus {
    #[must_use]
    pub const fn code(self) -> Option<u16> {
        match self {
            OutcomeStatus::Http(code) => Some(code),
            OutcomeStatus::Exception => None,
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeStatus::Http(code) => write!(f, "{}", code),
            OutcomeStatus::Exception => f.write_str(EXCEPTION_SENTINEL),
        }
    }
}

impl Serialize for OutcomeStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            OutcomeStatus::Http(code) => serializer.serialize_u16(*code),
            OutcomeStatus::Exception => serializer.serialize_str(EXCEPTION_SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for OutcomeStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawStatus {
            Code(u16),
            Text(String),
        }

        match RawStatus::deserialize(deserializer)? {
            RawStatus::Code(code) => Ok(OutcomeStatus::Http(code)),
            RawStatus::Text(text) if text == EXCEPTION_SENTINEL => Ok(OutcomeStatus::Exception),
            RawStatus::Text(text) => Err(serde::de::Error::custom(format!(
                "unknown outcome status '{}'",
                text
            ))),
        }
    }
}

/// Terminal result of one request slot, whatever number of attempts it took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestOutcome {
    pub index: usize,
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Raw response text, kept only when it could not be decoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    pub retry_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

impl RequestOutcome {
    #[must_use]
    pub const fn success(index: usize, status: u16, body: Value, retry_count: u32) -> Self {
        Self {
            index,
            status: OutcomeStatus::Http(status),
            body: Some(body),
            error: None,
            raw: None,
            retry_count,
            elapsed_ms: None,
        }
    }

    #[must_use]
    pub const fn http_error(index: usize, status: u16, text: String, retry_count: u32) -> Self {
        Self {
            index,
            status: OutcomeStatus::Http(status),
            body: None,
            error: Some(text),
            raw: None,
            retry_count,
            elapsed_ms: None,
        }
    }

    #[must_use]
    pub fn non_json(index: usize, status: u16, raw: String, retry_count: u32) -> Self {
        Self {
            index,
            status: OutcomeStatus::Http(status),
            body: None,
            error: Some(NON_JSON_RESPONSE.to_owned()),
            raw: Some(raw),
            retry_count,
            elapsed_ms: None,
        }
    }

    #[must_use]
    pub fn exhausted(index: usize, status: u16, body: Value, retry_count: u32) -> Self {
        Self {
            index,
            status: OutcomeStatus::Http(status),
            body: Some(body),
            error: Some(EXHAUSTED_RETRIES.to_owned()),
            raw: None,
            retry_count,
            elapsed_ms: None,
        }
    }

    /// Transport-level failure (timeout, refused or reset connection).
    #[must_use]
    pub const fn exception(index: usize, error: String, retry_count: u32) -> Self {
        Self {
            index,
            status: OutcomeStatus::Exception,
            body: None,
            error: Some(error),
            raw: None,
            retry_count,
            elapsed_ms: None,
        }
    }

    /// Outcome synthesized at the dispatch boundary for a slot that failed
    /// outside the executor's own handling.
    #[must_use]
    pub fn unexpected(index: usize, detail: &str) -> Self {
        Self::exception(index, format!("unexpected failure: {}", detail), 0)
    }

    #[must_use]
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed_ms = Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// True for a decoded response below 400 with no recorded error.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.status.code().is_some_and(|code| code < 400)
    }

    #[must_use]
    pub const fn is_exception(&self) -> bool {
        matches!(self.status, OutcomeStatus::Exception)
    }
}
