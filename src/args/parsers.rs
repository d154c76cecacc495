use std::time::Duration;

use super::types::{BackoffSchedule, PositiveUsize};
use crate::config::{parse_delay_value, parse_duration_value};
use crate::error::ValidationError;

pub(crate) fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    match s.split_once(':') {
        Some((key, value)) => Ok((key.trim().to_owned(), value.trim().to_owned())),
        None => Err(ValidationError::InvalidHeaderFormat {
            value: s.to_owned(),
        }),
    }
}

pub(super) fn parse_positive_usize(s: &str) -> Result<PositiveUsize, ValidationError> {
    s.parse::<PositiveUsize>()
}

pub(super) fn parse_duration_arg(s: &str) -> Result<Duration, ValidationError> {
    parse_duration_value(s)
}

pub(super) fn parse_delay_arg(s: &str) -> Result<Duration, ValidationError> {
    parse_delay_value(s)
}

/// Parses a comma separated backoff list such as `1s,3s,5s`.
pub(crate) fn parse_backoff(s: &str) -> Result<BackoffSchedule, ValidationError> {
    let delays = s
        .split(',')
        .map(parse_delay_value)
        .collect::<Result<Vec<_>, _>>()?;
    BackoffSchedule::new(delays)
}
