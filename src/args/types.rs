use std::num::NonZeroUsize;
use std::time::Duration;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveUsize(NonZeroUsize);

impl PositiveUsize {
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for PositiveUsize {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value)
            .map(PositiveUsize)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveUsize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: usize = s
            .trim()
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveUsize::try_from(value)
    }
}

impl From<PositiveUsize> for usize {
    fn from(value: PositiveUsize) -> Self {
        value.get()
    }
}

/// Ordered waits consulted before each retry (entry `n - 1` precedes retry `n`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffSchedule(Vec<Duration>);

impl BackoffSchedule {
    /// Builds a schedule from explicit delays.
    ///
    /// # Errors
    ///
    /// Returns an error when `delays` is empty.
    pub fn new(delays: Vec<Duration>) -> Result<Self, ValidationError> {
        if delays.is_empty() {
            return Err(ValidationError::BackoffEmpty);
        }
        Ok(Self(delays))
    }

    #[must_use]
    pub fn delays(&self) -> &[Duration] {
        &self.0
    }

    #[must_use]
    pub fn into_delays(self) -> Vec<Duration> {
        self.0
    }
}

impl Default for BackoffSchedule {
    fn default() -> Self {
        Self(super::defaults::default_backoff())
    }
}
