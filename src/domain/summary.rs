use super::RequestOutcome;

/// Tally of a finished run, logged once the report is on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub exceptions: usize,
    pub retries: u64,
}

impl RunSummary {
    #[must_use]
    pub fn from_outcomes(outcomes: &[RequestOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut summary, outcome| {
            summary.total = summary.total.saturating_add(1);
            if outcome.is_exception() {
                summary.exceptions = summary.exceptions.saturating_add(1);
            } else if outcome.is_success() {
                summary.succeeded = summary.succeeded.saturating_add(1);
            } else {
                summary.failed = summary.failed.saturating_add(1);
            }
            summary.retries = summary
                .retries
                .saturating_add(u64::from(outcome.retry_count));
            summary
        })
    }

    pub fn log(&self) {
        tracing::info!(
            "Run finished: {} requests, {} succeeded, {} failed, {} exceptions, {} retries",
            self.total,
            self.succeeded,
            self.failed,
            self.exceptions,
            self.retries
        );
    }
}
