use std::time::Duration;

pub(crate) const DEFAULT_USER_AGENT: &str =
    concat!("stagger/", env!("CARGO_PKG_VERSION"), " (diagnostic harness)");

/// File name of the run report, written next to the executable unless `--output` is set.
pub const DEFAULT_REPORT_FILE: &str = "compositions_result.json";

/// Transient upstream failure code reported inside a successful response body.
pub const DEFAULT_TRANSIENT_CODE: i64 = -2007;
pub const DEFAULT_TRANSIENT_MESSAGE: &str = "fetch failed";

pub const DEFAULT_RETRIES: u32 = 3;

/// Lower stagger bound used when none is configured.
pub const DEFAULT_STAGGER_MIN: Duration = Duration::from_secs(2);

pub(crate) fn default_backoff() -> Vec<Duration> {
    vec![
        Duration::from_secs(1),
        Duration::from_secs(3),
        Duration::from_secs(5),
    ]
}
