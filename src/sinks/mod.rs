//! Durable output of a run.
mod config;
mod writers;


pub use config::resolve_output_path;
pub use writers::{read_report, write_report};
