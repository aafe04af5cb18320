use async_trait::async_trait;
use log::{debug, info, trace, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use updatery_backend::{
    BackendError, ManagerCapabilities, PackageInfo, PackageManager, ScanError, UpgradeStream,
};
use updatery_platform::BackgroundCommand;

use crate::detection::{WINGET_PROGRAM, detect_winget};
use crate::exit_codes::WINGET_EXIT_CODES;
use crate::table::{Column, TableRow, try_parse_table};

/// Only packages from winget's own community source are offered for upgrade;
/// msstore and unmanaged (ARP) entries are left alone.
pub const WINGET_SOURCE: &str = "winget";

pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(120);

const LIST_ARGS: [&str; 1] = ["list"];

const UNKNOWN_FIELD: &str = "?";

#[derive(Debug, Clone)]
pub struct WingetBackend {
    program: PathBuf,
    scan_timeout: Duration,
}

impl WingetBackend {
    #[must_use]
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            scan_timeout: DEFAULT_SCAN_TIMEOUT,
        }
    }

    /// Use the winget found on this machine, or the bare program name if
    /// none was found.
    #[must_use]
    pub fn detect() -> Self {
        Self::new(detect_winget().unwrap_or_else(|| PathBuf::from(WINGET_PROGRAM)))
    }

    #[must_use]
    pub fn with_scan_timeout(mut self, timeout: Duration) -> Self {
        self.scan_timeout = timeout;
        self
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn build_command(&self, args: &[&str]) -> Command {
        debug!(
            "Building winget command: {} {}",
            self.program.display(),
            args.join(" ")
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        cmd.background();
        cmd
    }

    /// Run `winget list` and keep the rows that have a pending update.
    ///
    /// # Errors
    /// Returns an error if winget cannot be started, does not finish within
    /// the scan timeout, or prints no recognizable table.
    pub async fn try_scan(&self) -> Result<Vec<PackageInfo>, ScanError> {
        let program = self.program.display().to_string();
        info!("Scanning winget packages");

        let mut cmd = self.build_command(&LIST_ARGS);
        cmd.kill_on_drop(true);

        let output = match tokio::time::timeout(self.scan_timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(error)) => {
                return Err(ScanError::Spawn {
                    program,
                    details: error.to_string(),
                });
            }
            Err(_) => {
                return Err(ScanError::Timeout {
                    program,
                    seconds: self.scan_timeout.as_secs(),
                });
            }
        };

        debug!("winget list exit status: {:?}", output.status);
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.stderr.is_empty() {
            text.push('\n');
            text.push_str(&String::from_utf8_lossy(&output.stderr));
        }
        trace!("winget list output: {text}");

        let rows = try_parse_table(&text).map_err(|error| ScanError::MalformedOutput {
            program,
            details: error.as_str(),
        })?;
        Ok(updatable_packages(&rows))
    }

    fn upgrade_args(package_id: &str) -> [&str; 7] {
        [
            "upgrade",
            "--id",
            package_id,
            "--silent",
            "--disable-interactivity",
            "--accept-source-agreements",
            "--accept-package-agreements",
        ]
    }
}

/// Rows from the winget source that report an available version.
#[must_use]
pub fn updatable_packages(rows: &[TableRow]) -> Vec<PackageInfo> {
    rows.iter()
        .filter(|row| {
            row.get(Column::Source) == Some(WINGET_SOURCE)
                && row
                    .get(Column::Available)
                    .is_some_and(|available| !available.trim().is_empty())
        })
        .map(|row| {
            let field = |column| row.get(column).unwrap_or(UNKNOWN_FIELD);
            PackageInfo::new(
                field(Column::Name),
                field(Column::Id),
                field(Column::Version),
                field(Column::Available),
            )
        })
        .collect()
}

#[async_trait]
impl PackageManager for WingetBackend {
    fn name(&self) -> &'static str {
        "winget"
    }

    fn capabilities(&self) -> ManagerCapabilities {
        ManagerCapabilities {
            requires_elevation: true,
        }
    }

    fn is_installed(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    async fn scan(&self) -> Vec<PackageInfo> {
        match self.try_scan().await {
            Ok(packages) => {
                debug!("winget: {} package(s) with updates", packages.len());
                packages
            }
            Err(error) => {
                warn!("winget scan failed: {error}");
                Vec::new()
            }
        }
    }

    async fn start_upgrade(&self, package_id: &str) -> Result<UpgradeStream, BackendError> {
        info!("winget: upgrading {package_id}");
        UpgradeStream::spawn(self.build_command(&Self::upgrade_args(package_id)))
    }

    fn translate_exit_code(&self, code: i64) -> String {
        WINGET_EXIT_CODES.translate(code)
    }
}
