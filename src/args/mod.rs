//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod tests;

pub use cli::StaggerArgs;
pub use defaults::{
    DEFAULT_REPORT_FILE, DEFAULT_RETRIES, DEFAULT_STAGGER_MIN, DEFAULT_TRANSIENT_CODE,
    DEFAULT_TRANSIENT_MESSAGE,
};
pub use types::{BackoffSchedule, PositiveUsize};

pub(crate) use defaults::DEFAULT_USER_AGENT;
pub(crate) use parsers::parse_header;
