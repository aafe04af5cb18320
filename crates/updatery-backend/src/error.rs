use thiserror::Error;

/// Failure to start or drive an upgrade child process.
///
/// A child that starts and exits non-zero is not an error; that is reported
/// through [`crate::UpgradeOutcome::exit_code`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Failed to start {program}: {details}")]
    Spawn { program: String, details: String },

    #[error("IO error ({kind}): {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
}

impl BackendError {
    pub fn spawn(program: impl Into<String>, error: &std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            details: error.to_string(),
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Why a scan produced nothing. Adapters log this and hand the caller an
/// empty list, so "no updates" and "scan failed" look the same upstream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("{program} timed out after {seconds}s")]
    Timeout { program: String, seconds: u64 },

    #[error("Failed to start {program}: {details}")]
    Spawn { program: String, details: String },

    #[error("{program} exited with unexpected code {code}")]
    UnexpectedExit { program: String, code: i64 },

    #[error("Malformed {program} output: {details}")]
    MalformedOutput {
        program: String,
        details: &'static str,
    },

    #[error("Failed to decode {program} output: {details}")]
    Decode { program: String, details: String },
}
