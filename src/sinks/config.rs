use std::path::PathBuf;

use crate::args::DEFAULT_REPORT_FILE;
use crate::error::SinkError;

/// Returns `output` when given, else the default report file next to the
/// running executable.
///
/// # Errors
///
/// Returns an error when the executable location cannot be determined.
pub fn resolve_output_path(output: Option<&str>) -> Result<PathBuf, SinkError> {
    if let Some(path) = output {
        return Ok(PathBuf::from(path));
    }
    let exe = std::env::current_exe().map_err(|err| SinkError::ResolveExecutable { source: err })?;
    let dir = exe
        .parent()
        .ok_or_else(|| SinkError::ExecutableWithoutParent { path: exe.clone() })?;
    Ok(dir.join(DEFAULT_REPORT_FILE))
}
