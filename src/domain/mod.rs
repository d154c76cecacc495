//! Records produced by a run: one outcome per slot, folded into a report.
mod outcome;
mod report;
mod summary;


pub use outcome::{OutcomeStatus, RequestOutcome};
pub use report::{ConnectionProbe, RunReport};
pub use summary::RunSummary;
