//! One complete harness run: probe, dispatch, record, summarize.
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::args::{DEFAULT_STAGGER_MIN, StaggerArgs};
use crate::dispatch::{StaggerRange, dispatch};
use crate::domain::{RunReport, RunSummary};
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::{
    ExecutorConfig, RequestExecutor, RequestSpec, RetryPolicy, TransientSignature, build_client,
    load_body,
};
use crate::probe::probe_connection;
use crate::sinks::{resolve_output_path, write_report};

/// Validated, explicit inputs of a run. Nothing downstream reads ambient state.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub executor: ExecutorConfig,
    pub requests: usize,
    pub stagger: StaggerRange,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub probe_timeout: Option<Duration>,
    pub output: PathBuf,
}

impl RunPlan {
    /// Validates CLI/config values into a plan.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL, body, headers, backoff schedule,
    /// stagger range or output location are invalid.
    pub fn from_args(args: &StaggerArgs) -> AppResult<Self> {
        let url = args
            .url
            .as_deref()
            .ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;
        let body = load_body(args.data.as_deref(), args.data_file.as_deref())?;
        let spec = RequestSpec::new(url, args.token.as_deref(), &args.headers, body)?;
        if args.token.is_none() {
            tracing::warn!("No bearer token configured; sending requests without Authorization.");
        }

        let executor = ExecutorConfig {
            spec,
            retry: RetryPolicy::new(args.retries, args.backoff.clone())?,
            signature: TransientSignature::new(
                args.transient_code,
                args.transient_message.as_str(),
            ),
            preview_chars: args.preview_chars,
        };

        Ok(Self {
            executor,
            requests: args.requests.get(),
            stagger: stagger_range(args.stagger_min, args.stagger_max)?,
            request_timeout: args.request_timeout,
            connect_timeout: args.connect_timeout,
            probe_timeout: args.probe.then_some(args.probe_timeout),
            output: resolve_output_path(args.output.as_deref())?,
        })
    }
}

/// An unset minimum falls back to the default, capped at `max`; an explicit
/// minimum above `max` is still rejected.
fn stagger_range(min: Option<Duration>, max: Duration) -> Result<StaggerRange, ValidationError> {
    let min = min.unwrap_or_else(|| DEFAULT_STAGGER_MIN.min(max));
    StaggerRange::new(min, max)
}

/// Executes a plan and persists its report. Individual request failures are
/// recorded in the report; only setup and report-write failures are errors.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be built or the report
/// cannot be written.
pub async fn run(plan: RunPlan) -> AppResult<RunReport> {
    let url = plan.executor.spec.url().clone();
    info!(
        "Sending {} requests to {} (timeout {:.0}s, up to {} retries each)",
        plan.requests,
        url,
        plan.request_timeout.as_secs_f64(),
        plan.executor.retry.max_retries()
    );

    let probe = match plan.probe_timeout {
        Some(limit) => Some(probe_connection(&url, limit).await),
        None => None,
    };

    let client = build_client(plan.request_timeout, plan.connect_timeout)?;
    let executor = Arc::new(RequestExecutor::new(client, plan.executor));
    let outcomes = dispatch(executor, plan.requests, plan.stagger).await;

    let summary = RunSummary::from_outcomes(&outcomes);
    let report = RunReport::new(outcomes).with_connection_test(probe);
    write_report(&plan.output, &report).await?;

    summary.log();
    info!("Report written to {}", plan.output.display());
    Ok(report)
}
