use super::*;
use crate::error::{AppError, AppResult};
use clap::Parser;
use std::time::Duration;

fn parse_test_args<I, T>(args: I) -> AppResult<StaggerArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    StaggerArgs::try_parse_from(args).map_err(AppError::from)
}

#[test]
fn parse_args_defaults() -> AppResult<()> {
    let args = parse_test_args(["stagger", "-u", "http://localhost:5100/v1/images/compositions"])?;

    let checks = [
        (
            args.url.as_deref() == Some("http://localhost:5100/v1/images/compositions"),
            "Unexpected url",
        ),
        (args.headers.is_empty(), "Expected headers to be empty"),
        (args.data.is_none(), "Expected data to be None"),
        (args.data_file.is_none(), "Expected data_file to be None"),
        (args.requests.get() == 3, "Unexpected requests"),
        (
            args.stagger_min.is_none(),
            "Expected stagger_min to be unset",
        ),
        (
            args.stagger_max == Duration::from_secs(5),
            "Unexpected stagger_max",
        ),
        (args.retries == DEFAULT_RETRIES, "Unexpected retries"),
        (
            args.backoff == BackoffSchedule::default(),
            "Unexpected backoff",
        ),
        (
            args.request_timeout == Duration::from_secs(600),
            "Unexpected request_timeout",
        ),
        (
            args.connect_timeout == Duration::from_secs(30),
            "Unexpected connect_timeout",
        ),
        (args.output.is_none(), "Expected output to be None"),
        (
            args.transient_code == DEFAULT_TRANSIENT_CODE,
            "Unexpected transient_code",
        ),
        (
            args.transient_message == DEFAULT_TRANSIENT_MESSAGE,
            "Unexpected transient_message",
        ),
        (args.preview_chars == 500, "Unexpected preview_chars"),
        (!args.probe, "Expected probe to be false"),
        (
            args.probe_timeout == Duration::from_secs(10),
            "Unexpected probe_timeout",
        ),
        (args.config.is_none(), "Expected config to be None"),
        (!args.verbose, "Expected verbose to be false"),
    ];

    for (ok, msg) in checks {
        if !ok {
            return Err(AppError::validation(msg));
        }
    }

    Ok(())
}

#[test]
fn parse_args_accepts_long_timeouts_and_negative_code() -> AppResult<()> {
    let args = parse_test_args([
        "stagger",
        "-u",
        "http://localhost",
        "--timeout",
        "30m",
        "--transient-code",
        "-5000",
        "--backoff",
        "0,250ms,2s,1m",
        "--retries",
        "4",
    ])?;

    if args.request_timeout != Duration::from_secs(1800) {
        return Err(AppError::validation(format!(
            "Unexpected timeout: {:?}",
            args.request_timeout
        )));
    }
    if args.transient_code != -5000 {
        return Err(AppError::validation(format!(
            "Unexpected transient code: {}",
            args.transient_code
        )));
    }
    let expected = [
        Duration::ZERO,
        Duration::from_millis(250),
        Duration::from_secs(2),
        Duration::from_secs(60),
    ];
    if args.backoff.delays() != expected {
        return Err(AppError::validation(format!(
            "Unexpected backoff: {:?}",
            args.backoff
        )));
    }
    Ok(())
}

#[test]
fn parse_args_rejects_zero_timeout() -> AppResult<()> {
    let result = parse_test_args(["stagger", "-u", "http://localhost", "--timeout", "0"]);
    if result.is_ok() {
        return Err(AppError::validation("Expected zero timeout to be rejected"));
    }
    Ok(())
}

#[test]
fn parse_args_rejects_zero_requests() -> AppResult<()> {
    let result = parse_test_args(["stagger", "-u", "http://localhost", "-n", "0"]);
    if result.is_ok() {
        return Err(AppError::validation("Expected zero requests to be rejected"));
    }
    Ok(())
}

#[test]
fn parse_args_data_conflicts_with_data_file() -> AppResult<()> {
    let result = parse_test_args([
        "stagger",
        "-u",
        "http://localhost",
        "-d",
        "{}",
        "-D",
        "body.json",
    ]);
    if result.is_ok() {
        return Err(AppError::validation(
            "Expected --data and --data-file to conflict",
        ));
    }
    Ok(())
}

#[test]
fn parse_header_valid() -> AppResult<()> {
    let (key, value) = parse_header("X-Trace: abc:123")?;
    if key != "X-Trace" {
        return Err(AppError::validation(format!("Unexpected key: {}", key)));
    }
    if value != "abc:123" {
        return Err(AppError::validation(format!("Unexpected value: {}", value)));
    }
    Ok(())
}

#[test]
fn parse_header_invalid() -> AppResult<()> {
    if parse_header("MissingDelimiter").is_ok() {
        return Err(AppError::validation("Expected Err for invalid header"));
    }
    Ok(())
}

#[test]
fn parse_backoff_rejects_bad_entries() -> AppResult<()> {
    for value in ["", "1s,,3s", "1x", "fast"] {
        if parsers::parse_backoff(value).is_ok() {
            return Err(AppError::validation(format!(
                "Expected backoff '{}' to be rejected",
                value
            )));
        }
    }
    Ok(())
}
