use async_trait::async_trait;
use log::{debug, info, trace, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use updatery_backend::{
    BackendError, ManagerCapabilities, PackageInfo, PackageManager, ScanError, UpgradeStream,
};
use updatery_platform::BackgroundCommand;

use crate::detection::{NPM_PROGRAM, detect_npm};
use crate::exit_codes::NPM_EXIT_CODES;
use crate::outdated::packages_from_outdated_json;

pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(60);

const OUTDATED_ARGS: [&str; 3] = ["outdated", "-g", "--json"];

#[derive(Debug, Clone)]
pub struct NpmBackend {
    program: PathBuf,
    scan_timeout: Duration,
}

impl NpmBackend {
    #[must_use]
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            scan_timeout: DEFAULT_SCAN_TIMEOUT,
        }
    }

    #[must_use]
    pub fn detect() -> Self {
        Self::new(detect_npm().unwrap_or_else(|| PathBuf::from(NPM_PROGRAM)))
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
            "Building npm command: {} {}",
            self.program.display(),
            args.join(" ")
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        cmd.background();
        cmd
    }

    /// Run `npm outdated -g --json` and decode the result.
    ///
    /// npm exits 1 when anything is outdated, so both 0 and 1 are accepted.
    ///
    /// # Errors
    /// Returns an error if npm cannot be started, times out, exits with any
    /// other code, or prints something that is not a JSON object.
    pub async fn try_scan(&self) -> Result<Vec<PackageInfo>, ScanError> {
        let program = self.program.display().to_string();
        info!("Scanning global npm packages");

        let mut cmd = self.build_command(&OUTDATED_ARGS);
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

        let code = output.status.code().map_or(0, i64::from);
        if code != 0 && code != 1 {
            return Err(ScanError::UnexpectedExit { program, code });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        trace!("npm outdated output: {stdout}");

        packages_from_outdated_json(&stdout).map_err(|error| ScanError::Decode {
            program,
            details: error.to_string(),
        })
    }

    fn upgrade_args(package_id: &str) -> [&str; 3] {
        ["update", "-g", package_id]
    }
}

#[async_trait]
impl PackageManager for NpmBackend {
    fn name(&self) -> &'static str {
        "npm"
    }

    fn capabilities(&self) -> ManagerCapabilities {
        ManagerCapabilities {
            requires_elevation: false,
        }
    }

    fn is_installed(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    async fn scan(&self) -> Vec<PackageInfo> {
        match self.try_scan().await {
            Ok(packages) => {
                debug!("npm: {} outdated global package(s)", packages.len());
                packages
            }
            Err(error) => {
                warn!("npm scan failed: {error}");
                Vec::new()
            }
        }
    }

    async fn start_upgrade(&self, package_id: &str) -> Result<UpgradeStream, BackendError> {
        info!("npm: updating {package_id}");
        UpgradeStream::spawn(self.build_command(&Self::upgrade_args(package_id)))
    }

    fn translate_exit_code(&self, code: i64) -> String {
        NPM_EXIT_CODES.translate(code)
    }
}
