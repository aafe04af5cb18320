use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use updatery_backend::{
    BackendError, ManagerCapabilities, PackageInfo, PackageManager, UpgradeStream,
};

/// A scriptable adapter: scans return canned records after an optional
/// delay, upgrades run `sh -c <script> sh <id>`.
#[derive(Debug, Clone)]
pub(crate) struct MockManager {
    pub installed: bool,
    pub requires_elevation: bool,
    pub packages: Vec<PackageInfo>,
    pub scan_delay: Duration,
    pub script: String,
}

impl Default for MockManager {
    fn default() -> Self {
        Self {
            installed: true,
            requires_elevation: false,
            packages: Vec::new(),
            scan_delay: Duration::ZERO,
            script: "echo upgrading $1".to_string(),
        }
    }
}

impl MockManager {
    pub fn with_packages(ids: &[&str]) -> Self {
        Self {
            packages: ids.iter().map(|id| package(id)).collect(),
            ..Self::default()
        }
    }
}

pub(crate) fn package(id: &str) -> PackageInfo {
    PackageInfo::new(id.to_uppercase(), id, "1.0", "2.0")
}

#[async_trait]
impl PackageManager for MockManager {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn capabilities(&self) -> ManagerCapabilities {
        ManagerCapabilities {
            requires_elevation: self.requires_elevation,
        }
    }

    fn is_installed(&self) -> bool {
        self.installed
    }

    async fn scan(&self) -> Vec<PackageInfo> {
        if !self.scan_delay.is_zero() {
            tokio::time::sleep(self.scan_delay).await;
        }
        self.packages.clone()
    }

    async fn start_upgrade(&self, package_id: &str) -> Result<UpgradeStream, BackendError> {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", self.script.as_str(), "sh", package_id]);
        UpgradeStream::spawn(cmd)
    }

    fn translate_exit_code(&self, code: i64) -> String {
        format!("mock code {code}")
    }
}
