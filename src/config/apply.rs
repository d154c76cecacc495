use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{BackoffSchedule, PositiveUsize, StaggerArgs, parse_header};
use crate::error::ConfigError;

use super::types::{ConfigFile, StaggerConfig, TransientConfig};

/// Applies configuration values to CLI arguments. Options given on the
/// command line always win over the config file.
///
/// # Errors
///
/// Returns an error when config values are invalid or conflict with each other.
pub fn apply_config(
    args: &mut StaggerArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if config.payload.is_some() && config.data_file.is_some() {
        return Err(ConfigError::Conflict {
            left: "payload",
            right: "data_file",
        });
    }

    if !is_cli(matches, "url") {
        if let Some(url) = config.url.clone() {
            args.url = Some(url);
        }
    }

    // `token` can also come from STAGGER_TOKEN; the environment beats the file.
    if args.token.is_none() {
        args.token.clone_from(&config.token);
    }

    if !is_cli(matches, "headers") {
        if let Some(headers) = config.headers.as_ref() {
            let mut parsed = Vec::with_capacity(headers.len());
            for header in headers {
                parsed.push(
                    parse_header(header)
                        .map_err(|err| ConfigError::InvalidHeader { source: err })?,
                );
            }
            args.headers = parsed;
        }
    }

    apply_body(args, matches, config)?;

    if !is_cli(matches, "requests") {
        if let Some(requests) = config.requests {
            args.requests = PositiveUsize::try_from(requests).map_err(|err| {
                ConfigError::FieldMustBePositive {
                    field: "requests",
                    source: err,
                }
            })?;
        }
    }

    if let Some(stagger) = config.stagger.as_ref() {
        apply_stagger(args, matches, stagger)?;
    }

    if !is_cli(matches, "retries") {
        if let Some(retries) = config.retries {
            args.retries = retries;
        }
    }

    if !is_cli(matches, "backoff") {
        if let Some(backoff) = config.backoff.as_ref() {
            let delays = backoff
                .iter()
                .map(super::types::DurationValue::to_delay)
                .collect::<Result<Vec<_>, _>>()
                .and_then(BackoffSchedule::new)
                .map_err(|err| ConfigError::InvalidDuration {
                    field: "backoff",
                    source: err,
                })?;
            args.backoff = delays;
        }
    }

    if !is_cli(matches, "request_timeout") {
        if let Some(timeout) = config.timeout.as_ref() {
            args.request_timeout =
                timeout
                    .to_duration()
                    .map_err(|err| ConfigError::InvalidDuration {
                        field: "timeout",
                        source: err,
                    })?;
        }
    }

    if !is_cli(matches, "connect_timeout") {
        if let Some(timeout) = config.connect_timeout.as_ref() {
            args.connect_timeout =
                timeout
                    .to_duration()
                    .map_err(|err| ConfigError::InvalidDuration {
                        field: "connect_timeout",
                        source: err,
                    })?;
        }
    }

    if !is_cli(matches, "output") {
        if let Some(output) = config.output.clone() {
            args.output = Some(output);
        }
    }

    if let Some(transient) = config.transient.as_ref() {
        apply_transient(args, matches, transient);
    }

    if !is_cli(matches, "preview_chars") {
        if let Some(preview_chars) = config.preview_chars {
            args.preview_chars = preview_chars;
        }
    }

    if !is_cli(matches, "probe") {
        if let Some(probe) = config.probe {
            args.probe = probe;
        }
    }

    if !is_cli(matches, "probe_timeout") {
        if let Some(timeout) = config.probe_timeout.as_ref() {
            args.probe_timeout =
                timeout
                    .to_duration()
                    .map_err(|err| ConfigError::InvalidDuration {
                        field: "probe_timeout",
                        source: err,
                    })?;
        }
    }

    Ok(())
}

fn apply_body(
    args: &mut StaggerArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if is_cli(matches, "data") || is_cli(matches, "data_file") {
        return Ok(());
    }
    if let Some(payload) = config.payload.as_ref() {
        let text = serde_json::to_string(payload)
            .map_err(|err| ConfigError::SerializePayload { source: err })?;
        args.data = Some(text);
        args.data_file = None;
    } else if let Some(path) = config.data_file.clone() {
        args.data_file = Some(path);
        args.data = None;
    }
    Ok(())
}

fn apply_stagger(
    args: &mut StaggerArgs,
    matches: &ArgMatches,
    stagger: &StaggerConfig,
) -> Result<(), ConfigError> {
    if !is_cli(matches, "stagger_min") {
        if let Some(min) = stagger.min.as_ref() {
            args.stagger_min = Some(min.to_delay().map_err(|err| {
                ConfigError::InvalidDuration {
                    field: "stagger.min",
                    source: err,
                }
            })?);
        }
    }
    if !is_cli(matches, "stagger_max") {
        if let Some(max) = stagger.max.as_ref() {
            args.stagger_max = max.to_delay().map_err(|err| ConfigError::InvalidDuration {
                field: "stagger.max",
                source: err,
            })?;
        }
    }
    Ok(())
}

fn apply_transient(args: &mut StaggerArgs, matches: &ArgMatches, transient: &TransientConfig) {
    if !is_cli(matches, "transient_code") {
        if let Some(code) = transient.code {
            args.transient_code = code;
        }
    }
    if !is_cli(matches, "transient_message") {
        if let Some(message) = transient.message.clone() {
            args.transient_message = message;
        }
    }
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}
