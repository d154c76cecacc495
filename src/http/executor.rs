use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::args::{BackoffSchedule, DEFAULT_RETRIES};
use crate::dispatch::SlotRunner;
use crate::domain::RequestOutcome;
use crate::error::ValidationError;

use super::classify::{Classification, TransientSignature, classify};
use super::request::RequestSpec;

/// Attempt budget plus the waits taken before each retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff: Vec<Duration>,
}

impl RetryPolicy {
    /// # Errors
    ///
    /// Returns an error when the schedule has fewer entries than `max_retries`.
    pub fn new(max_retries: u32, backoff: BackoffSchedule) -> Result<Self, ValidationError> {
        let backoff = backoff.into_delays();
        let covered = u32::try_from(backoff.len()).unwrap_or(u32::MAX);
        if covered < max_retries {
            return Err(ValidationError::BackoffTooShort {
                retries: max_retries,
                len: backoff.len(),
            });
        }
        Ok(Self {
            max_retries,
            backoff,
        })
    }

    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Wait before `attempt` (1-based retry number). The initial attempt never waits.
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        let Some(slot) = attempt.checked_sub(1) else {
            return Duration::ZERO;
        };
        usize::try_from(slot)
            .ok()
            .and_then(|slot| self.backoff.get(slot))
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_RETRIES,
            backoff: BackoffSchedule::default().into_delays(),
        }
    }
}

/// Everything an executor needs besides the HTTP client.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub spec: RequestSpec,
    pub retry: RetryPolicy,
    pub signature: TransientSignature,
    pub preview_chars: usize,
}

/// Per-attempt observations; logged, then folded into the slot outcome.
struct AttemptContext {
    attempt: u32,
    elapsed: Duration,
    raw: String,
}

impl AttemptContext {
    fn log(&self, index: usize, status: u16, preview_chars: usize) {
        info!(
            "[#{}] attempt {} -> status {} in {:.2}s",
            index,
            self.attempt,
            status,
            self.elapsed.as_secs_f64()
        );
        let preview: String = self.raw.chars().take(preview_chars).collect();
        info!(
            "[#{}] response preview (first {} chars): {:?}",
            index, preview_chars, preview
        );
    }
}

/// Runs the retry protocol for one slot at a time; clones share the client pool.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    client: Client,
    config: Arc<ExecutorConfig>,
}

impl RequestExecutor {
    #[must_use]
    pub fn new(client: Client, config: ExecutorConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Performs up to `max_retries + 1` attempts and returns exactly one outcome.
    ///
    /// Only the transient signature is retried. Transport failures, HTTP
    /// errors and undecodable bodies end the slot on the attempt they occur.
    pub async fn execute(&self, index: usize) -> RequestOutcome {
        let slot_start = Instant::now();
        self.log_request(index);
        let mut attempt: u32 = 0;

        loop {
            if attempt > 0 {
                let delay = self.config.retry.delay_before(attempt);
                info!(
                    "[#{}] retry {} of {}, waiting {:.2}s",
                    index,
                    attempt,
                    self.config.retry.max_retries(),
                    delay.as_secs_f64()
                );
                sleep(delay).await;
            }

            let attempt_start = Instant::now();
            let response = match self.config.spec.build(&self.client).send().await {
                Ok(response) => response,
                Err(err) => {
                    return transport_failure(index, attempt, attempt_start.elapsed(), &err)
                        .with_elapsed(slot_start.elapsed());
                }
            };
            let status = response.status().as_u16();
            let raw = match response.text().await {
                Ok(raw) => raw,
                Err(err) => {
                    return transport_failure(index, attempt, attempt_start.elapsed(), &err)
                        .with_elapsed(slot_start.elapsed());
                }
            };

            let context = AttemptContext {
                attempt,
                elapsed: attempt_start.elapsed(),
                raw,
            };
            context.log(index, status, self.config.preview_chars);

            let outcome = match classify(status, &context.raw, &self.config.signature) {
                Classification::TerminalError => {
                    warn!("[#{}] HTTP error status {}", index, status);
                    RequestOutcome::http_error(index, status, context.raw, attempt)
                }
                Classification::MalformedResponse => {
                    warn!("[#{}] response is not JSON", index);
                    RequestOutcome::non_json(index, status, context.raw, attempt)
                }
                Classification::TerminalSuccess(body) => {
                    info!("[#{}] request succeeded after {} retries", index, attempt);
                    RequestOutcome::success(index, status, body, attempt)
                }
                Classification::Retryable(body) => {
                    if attempt < self.config.retry.max_retries() {
                        info!(
                            "[#{}] transient upstream failure (code {}), will retry",
                            index, self.config.signature.code
                        );
                        attempt = attempt.saturating_add(1);
                        continue;
                    }
                    warn!(
                        "[#{}] transient failure persisted after {} retries, giving up",
                        index, attempt
                    );
                    RequestOutcome::exhausted(index, status, body, attempt)
                }
            };
            return outcome.with_elapsed(slot_start.elapsed());
        }
    }

    fn log_request(&self, index: usize) {
        let spec = &self.config.spec;
        info!("[#{}] request starting: POST {}", index, spec.url());
        match serde_json::to_string(&spec.masked_headers()) {
            Ok(headers) => info!("[#{}] headers: {}", index, headers),
            Err(err) => debug!("[#{}] headers not printable: {}", index, err),
        }
        info!("[#{}] payload: {}", index, spec.body());
    }
}

#[async_trait]
impl SlotRunner for RequestExecutor {
    async fn run(&self, index: usize) -> RequestOutcome {
        self.execute(index).await
    }
}

fn transport_failure(
    index: usize,
    attempt: u32,
    elapsed: Duration,
    err: &reqwest::Error,
) -> RequestOutcome {
    let detail = if err.is_timeout() {
        format!("request timed out ({:.2}s): {}", elapsed.as_secs_f64(), err)
    } else if err.is_connect() {
        format!("connection failed ({:.2}s): {}", elapsed.as_secs_f64(), err)
    } else {
        format!("HTTP client error ({:.2}s): {}", elapsed.as_secs_f64(), err)
    };
    warn!("[#{}] {}", index, detail);
    RequestOutcome::exception(index, detail, attempt)
}
