#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppErrorDetail {
    Message(String),
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
}

impl std::fmt::Display for AppErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message(message) => write!(f, "{message}"),
            Self::Io { kind, message } => write!(f, "{kind}: {message}"),
        }
    }
}

impl From<String> for AppErrorDetail {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl From<&str> for AppErrorDetail {
    fn from(value: &str) -> Self {
        Self::Message(value.to_string())
    }
}

impl From<std::io::Error> for AppErrorDetail {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppErrorDetail {
    fn from(value: serde_json::Error) -> Self {
        Self::Message(value.to_string())
    }
}

impl From<updatery_platform::AppPathsError> for AppErrorDetail {
    fn from(value: updatery_platform::AppPathsError) -> Self {
        Self::Message(value.to_string())
    }
}

/// Failures of the front end itself. Scan and upgrade problems are not
/// errors here; they end up in a panel's log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    ManagerNotInstalled {
        manager: &'static str,
    },
    UpgradesFailed {
        manager: &'static str,
        remaining: usize,
    },
    PackagesSkipped {
        manager: &'static str,
        package_ids: Vec<String>,
    },
    SettingsUnavailable {
        details: AppErrorDetail,
    },
    SettingsSaveFailed {
        details: AppErrorDetail,
    },
    OutputFailed {
        format: &'static str,
        details: AppErrorDetail,
    },
}

impl AppError {
    pub fn settings_unavailable(details: impl Into<AppErrorDetail>) -> Self {
        Self::SettingsUnavailable {
            details: details.into(),
        }
    }

    pub fn settings_save_failed(details: impl Into<AppErrorDetail>) -> Self {
        Self::SettingsSaveFailed {
            details: details.into(),
        }
    }

    pub fn output_failed(format: &'static str, details: impl Into<AppErrorDetail>) -> Self {
        Self::OutputFailed {
            format,
            details: details.into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ManagerNotInstalled { manager } => write!(f, "{manager} is not installed"),
            Self::UpgradesFailed { manager, remaining } => {
                write!(f, "{remaining} {manager} package(s) were not upgraded")
            }
            Self::PackagesSkipped {
                manager,
                package_ids,
            } => write!(
                f,
                "No pending {manager} update for: {}",
                package_ids.join(", ")
            ),
            Self::SettingsUnavailable { details } => {
                write!(f, "Settings location unavailable: {details}")
            }
            Self::SettingsSaveFailed { details } => {
                write!(f, "Failed to save settings: {details}")
            }
            Self::OutputFailed { format, details } => {
                write!(f, "Failed to write {format} output: {details}")
            }
        }
    }
}

impl std::error::Error for AppError {}
