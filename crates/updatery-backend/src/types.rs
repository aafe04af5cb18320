use serde::{Deserialize, Serialize};

/// One package with a pending update, as reported by a single scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub package_id: String,
    pub current_version: String,
    pub available_version: String,
}

impl PackageInfo {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        package_id: impl Into<String>,
        current_version: impl Into<String>,
        available_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            package_id: package_id.into(),
            current_version: current_version.into(),
            available_version: available_version.into(),
        }
    }
}

/// Result of one upgrade child that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeOutcome {
    pub exit_code: i64,
    pub output: String,
}

impl UpgradeOutcome {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}
