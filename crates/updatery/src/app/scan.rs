//! Package scans.
//!
//! Handles messages: `ScanCompleted`

use log::debug;
use updatery_backend::PackageInfo;

use crate::manager_kind::ManagerKind;
use crate::message::Message;
use crate::state::LogLevel;

use super::Updatery;

impl Updatery {
    /// Start a scan, superseding one already in flight for this manager.
    pub fn refresh(&mut self, kind: ManagerKind) {
        let sender = self.sender.clone();
        let Some(panel) = self.panels.get_mut(&kind) else {
            return;
        };

        if !panel.installed {
            let name = panel.name();
            panel.push_log(LogLevel::Warning, format!("{name} is not installed."));
            return;
        }

        let request_seq = panel.scan.begin();
        panel.push_log(
            LogLevel::Info,
            format!("Scanning for {} updates...", panel.name()),
        );

        let manager = panel.manager.clone();
        let task = tokio::spawn(async move {
            let packages = manager.scan().await;
            let _ = sender.send(Message::ScanCompleted {
                manager: kind,
                request_seq,
                packages,
            });
        });
        panel.scan.attach(task.abort_handle());
    }

    pub(super) fn handle_scan_completed(
        &mut self,
        kind: ManagerKind,
        request_seq: u64,
        packages: Vec<PackageInfo>,
    ) {
        let Some(panel) = self.panels.get_mut(&kind) else {
            return;
        };
        if !panel.scan.finish(request_seq) {
            return;
        }

        debug!("{kind} scan {request_seq} returned {} record(s)", packages.len());
        let count = packages.len();
        panel.set_packages(packages);
        panel.push_log(
            LogLevel::Info,
            format!("Found {count} {} package(s) with updates.", panel.name()),
        );
    }
}
