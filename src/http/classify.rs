use serde_json::Value;

use crate::args::{DEFAULT_TRANSIENT_CODE, DEFAULT_TRANSIENT_MESSAGE};

/// Marks an application-level failure, reported inside a successful HTTP
/// response, that is expected to clear up on retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientSignature {
    pub code: i64,
    pub message: String,
}

impl TransientSignature {
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// `body.code` equals the designated code and `body.message` contains the fragment.
    #[must_use]
    pub fn matches(&self, body: &Value) -> bool {
        let code_matches = body.get("code").and_then(integral_code) == Some(self.code);
        code_matches
            && body
                .get("message")
                .and_then(Value::as_str)
                .is_some_and(|message| message.contains(self.message.as_str()))
    }
}

/// Reads `code` as an integer, accepting integral floats such as `-2007.0`.
fn integral_code(value: &Value) -> Option<i64> {
    if let Some(code) = value.as_i64() {
        return Some(code);
    }
    let float = value.as_f64()?;
    let truncated = float as i64;
    ((truncated as f64).to_bits() == float.to_bits()).then_some(truncated)
}

impl Default for TransientSignature {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSIENT_CODE, DEFAULT_TRANSIENT_MESSAGE)
    }
}

/// What a single received response means for the retry protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Decoded body carries the transient signature.
    Retryable(Value),
    /// HTTP status >= 400; the raw text is the diagnosis.
    TerminalError,
    TerminalSuccess(Value),
    /// Status < 400 but the body is not JSON.
    MalformedResponse,
}

/// Classifies one HTTP response. Transport failures never reach this point.
#[must_use]
pub fn classify(status: u16, text: &str, signature: &TransientSignature) -> Classification {
    if status >= 400 {
        return Classification::TerminalError;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(body) if signature.matches(&body) => Classification::Retryable(body),
        Ok(body) => Classification::TerminalSuccess(body),
        Err(_) => Classification::MalformedResponse,
    }
}
