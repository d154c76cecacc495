//! Core library for the `stagger` CLI.
//!
//! `stagger` fires a fixed JSON POST at one endpoint from several concurrently
//! running slots whose start times are staggered, retries each slot when the
//! response carries a designated transient upstream error, and writes one
//! JSON report with exactly one outcome per slot. The binary wires CLI
//! arguments and config files into [`app::RunPlan`]; everything below it
//! takes explicit values so it can be driven from tests.
pub mod app;
pub mod args;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod http;
pub mod probe;
pub mod sinks;
