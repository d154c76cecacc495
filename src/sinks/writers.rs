use std::path::Path;

use crate::domain::RunReport;
use crate::error::SinkError;

/// Writes the report as pretty-printed UTF-8 JSON, replacing any previous file.
///
/// Non-ASCII text is written as-is rather than `\u` escaped.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized or written. There is
/// no retry; callers treat this as fatal.
pub async fn write_report(path: &Path, report: &RunReport) -> Result<(), SinkError> {
    let json =
        serde_json::to_vec_pretty(report).map_err(|err| SinkError::SerializeReport { source: err })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|err| SinkError::WriteReport {
            path: path.to_path_buf(),
            source: err,
        })?;
    Ok(())
}

/// Reads back a report written by [`write_report`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid report.
pub async fn read_report(path: &Path) -> Result<RunReport, SinkError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| SinkError::ReadReport {
            path: path.to_path_buf(),
            source: err,
        })?;
    serde_json::from_slice(&bytes).map_err(|err| SinkError::ParseReport {
        path: path.to_path_buf(),
        source: err,
    })
}
