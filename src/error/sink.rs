use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to locate the running executable: {source}")]
    ResolveExecutable {
        #[source]
        source: std::io::Error,
    },
    #[error("Executable path '{path}' has no parent directory.")]
    ExecutableWithoutParent { path: PathBuf },
    #[error("Failed to serialize run report: {source}")]
    SerializeReport {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write run report '{path}': {source}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read run report '{path}': {source}")]
    ReadReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse run report '{path}': {source}")]
    ParseReport {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
