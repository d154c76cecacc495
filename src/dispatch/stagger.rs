use std::time::Duration;

use rand::distributions::{Distribution, Uniform};
use rand::thread_rng;

use crate::error::ValidationError;

/// Inclusive range the delay between two consecutive launches is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaggerRange {
    min: Duration,
    max: Duration,
}

impl StaggerRange {
    /// # Errors
    ///
    /// Returns an error when `min` is greater than `max`.
    pub fn new(min: Duration, max: Duration) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::StaggerRangeInverted {
                min_ms: min.as_millis(),
                max_ms: max.as_millis(),
            });
        }
        Ok(Self { min, max })
    }

    /// Launch every slot back to back.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn min(&self) -> Duration {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Draws one delay uniformly from `[min, max]`.
    #[must_use]
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        Uniform::new_inclusive(self.min, self.max).sample(&mut thread_rng())
    }
}
