use clap::Parser;
use std::time::Duration;

use super::defaults::{DEFAULT_RETRIES, DEFAULT_TRANSIENT_CODE, DEFAULT_TRANSIENT_MESSAGE};
use super::parsers::{
    parse_backoff, parse_delay_arg, parse_duration_arg, parse_header, parse_positive_usize,
};
use super::types::{BackoffSchedule, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async HTTP diagnostic harness - fires staggered concurrent POSTs at one endpoint, retries transient upstream failures on a fixed backoff schedule, and records every outcome to a JSON report."
)]
pub struct StaggerArgs {
    /// Target URL for the POST requests
    #[arg(long, short)]
    pub url: Option<String>,

    /// Bearer token sent in the Authorization header
    #[arg(long, env = "STAGGER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Extra HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long, short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// JSON request body
    #[arg(long, short, conflicts_with = "data_file")]
    pub data: Option<String>,

    /// JSON request body read from a file
    #[arg(long = "data-file", short = 'D')]
    pub data_file: Option<String>,

    /// Number of concurrent request slots to launch
    #[arg(
        long = "requests",
        short = 'n',
        default_value = "3",
        value_parser = parse_positive_usize
    )]
    pub requests: PositiveUsize,

    /// Lower bound of the random delay between slot launches (supports ms/s/m/h).
    /// Defaults to 2s, lowered to --stagger-max when that is smaller.
    #[arg(long = "stagger-min", value_parser = parse_delay_arg)]
    pub stagger_min: Option<Duration>,

    /// Upper bound of the random delay between slot launches (supports ms/s/m/h)
    #[arg(long = "stagger-max", default_value = "5s", value_parser = parse_delay_arg)]
    pub stagger_max: Duration,

    /// Retries allowed per slot after the initial attempt
    #[arg(long = "retries", default_value_t = DEFAULT_RETRIES)]
    pub retries: u32,

    /// Comma separated waits before each retry (e.g. 1s,3s,5s)
    #[arg(long = "backoff", default_value = "1s,3s,5s", value_parser = parse_backoff)]
    pub backoff: BackoffSchedule,

    /// Per-attempt request timeout (supports ms/s/m/h, must be > 0)
    #[arg(long = "timeout", default_value = "600s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// TCP connect timeout (supports ms/s/m/h, must be > 0)
    #[arg(long = "connect-timeout", default_value = "30s", value_parser = parse_duration_arg)]
    pub connect_timeout: Duration,

    /// Report path (defaults to compositions_result.json next to the executable)
    #[arg(long, short)]
    pub output: Option<String>,

    /// Application error code that marks a transient upstream failure
    #[arg(
        long = "transient-code",
        default_value_t = DEFAULT_TRANSIENT_CODE,
        allow_hyphen_values = true
    )]
    pub transient_code: i64,

    /// Message fragment that must accompany the transient error code
    #[arg(long = "transient-message", default_value = DEFAULT_TRANSIENT_MESSAGE)]
    pub transient_message: String,

    /// Characters of each response shown in the console preview
    #[arg(long = "preview-chars", default_value = "500")]
    pub preview_chars: usize,

    /// Probe the target with a plain TCP connect before dispatching
    #[arg(long = "probe")]
    pub probe: bool,

    /// Timeout for the TCP probe (supports ms/s/m/h, must be > 0)
    #[arg(long = "probe-timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub probe_timeout: Duration,

    /// Path to config file (TOML/JSON). Defaults to ./stagger.toml or ./stagger.json if present.
    #[arg(long, short)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}
