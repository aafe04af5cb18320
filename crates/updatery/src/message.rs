use updatery_backend::{BackendError, PackageInfo, UpgradeOutcome};

use crate::manager_kind::ManagerKind;

/// Results sent from background tasks to the foreground loop. Every variant
/// carries the `request_seq` of the operation that produced it so stale
/// results can be dropped.
#[derive(Debug, Clone)]
pub enum Message {
    ScanCompleted {
        manager: ManagerKind,
        request_seq: u64,
        packages: Vec<PackageInfo>,
    },
    UpgradeStarted {
        manager: ManagerKind,
        request_seq: u64,
        package_id: String,
    },
    UpgradeOutput {
        manager: ManagerKind,
        request_seq: u64,
        package_id: String,
        line: String,
    },
    UpgradeFinished {
        manager: ManagerKind,
        request_seq: u64,
        package_id: String,
        result: Result<UpgradeOutcome, BackendError>,
    },
    BatchCompleted {
        manager: ManagerKind,
        request_seq: u64,
    },
}

impl Message {
    pub fn manager(&self) -> ManagerKind {
        match self {
            Self::ScanCompleted { manager, .. }
            | Self::UpgradeStarted { manager, .. }
            | Self::UpgradeOutput { manager, .. }
            | Self::UpgradeFinished { manager, .. }
            | Self::BatchCompleted { manager, .. } => *manager,
        }
    }

    pub fn request_seq(&self) -> u64 {
        match self {
            Self::ScanCompleted { request_seq, .. }
            | Self::UpgradeStarted { request_seq, .. }
            | Self::UpgradeOutput { request_seq, .. }
            | Self::UpgradeFinished { request_seq, .. }
            | Self::BatchCompleted { request_seq, .. } => *request_seq,
        }
    }

    pub fn is_scan(&self) -> bool {
        matches!(self, Self::ScanCompleted { .. })
    }
}
