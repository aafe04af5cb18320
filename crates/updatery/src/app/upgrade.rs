//! Sequential upgrade batches.
//!
//! Handles messages: `UpgradeStarted`, `UpgradeOutput`, `UpgradeFinished`,
//! `BatchCompleted`

use log::{debug, info, trace};
use tokio::sync::mpsc::UnboundedSender;
use updatery_backend::{BackendError, PackageManager, UpgradeOutcome};

use crate::manager_kind::ManagerKind;
use crate::message::Message;
use crate::state::LogLevel;

use super::Updatery;

impl Updatery {
    /// Upgrade the selected packages one after another, in selection order.
    pub fn upgrade_selected(&mut self, kind: ManagerKind) {
        let sender = self.sender.clone();
        let Some(panel) = self.panels.get_mut(&kind) else {
            return;
        };

        if !panel.installed {
            let name = panel.name();
            panel.push_log(LogLevel::Warning, format!("{name} is not installed."));
            return;
        }
        if panel.selection.is_empty() {
            panel.push_log(LogLevel::Warning, "No packages selected.");
            return;
        }

        let package_ids = panel.selection.clone();
        let request_seq = panel.upgrade.begin();
        panel.push_log(
            LogLevel::Info,
            format!(
                "Upgrading {} {} package(s)...",
                package_ids.len(),
                panel.name()
            ),
        );

        let manager = panel.manager.clone();
        let task = tokio::spawn(run_batch(manager, kind, request_seq, package_ids, sender));
        panel.upgrade.attach(task.abort_handle());
    }

    pub(super) fn handle_upgrade_started(&mut self, kind: ManagerKind, package_id: &str) {
        if let Some(panel) = self.panels.get_mut(&kind) {
            let name = panel.name();
            panel.push_log(LogLevel::Info, format!(">>> {name} upgrade {package_id}"));
        }
    }

    pub(super) fn handle_upgrade_output(
        &mut self,
        kind: ManagerKind,
        package_id: &str,
        line: String,
    ) {
        trace!("{kind} {package_id}: {line}");
        if line.trim().is_empty() {
            return;
        }
        if let Some(panel) = self.panels.get_mut(&kind) {
            panel.push_log(LogLevel::Output, line);
        }
    }

    pub(super) fn handle_upgrade_finished(
        &mut self,
        kind: ManagerKind,
        package_id: &str,
        result: Result<UpgradeOutcome, BackendError>,
    ) {
        let Some(panel) = self.panels.get_mut(&kind) else {
            return;
        };

        match result {
            Ok(outcome) if outcome.succeeded() => {
                panel.remove_package(package_id);
                panel.push_log(
                    LogLevel::Success,
                    format!("Successfully upgraded {package_id}"),
                );
            }
            Ok(outcome) => {
                let message = panel.manager.translate_exit_code(outcome.exit_code);
                debug!(
                    "{kind} upgrade of {package_id} exited with {}",
                    outcome.exit_code
                );
                panel.push_log(LogLevel::Error, format!("{package_id}: {message}"));
            }
            Err(error) => {
                panel.push_log(
                    LogLevel::Error,
                    format!("Error upgrading {package_id}: {error}"),
                );
            }
        }
    }

    pub(super) fn handle_batch_completed(&mut self, kind: ManagerKind, request_seq: u64) {
        if let Some(panel) = self.panels.get_mut(&kind)
            && panel.upgrade.finish(request_seq)
        {
            panel.push_log(LogLevel::Info, "All upgrades complete.");
        }
    }
}

/// Run each upgrade to completion before starting the next. A failed item
/// never stops the batch.
pub(crate) async fn run_batch(
    manager: Box<dyn PackageManager>,
    kind: ManagerKind,
    request_seq: u64,
    package_ids: Vec<String>,
    sender: UnboundedSender<Message>,
) {
    info!("{kind}: upgrading {} package(s)", package_ids.len());

    for package_id in package_ids {
        let _ = sender.send(Message::UpgradeStarted {
            manager: kind,
            request_seq,
            package_id: package_id.clone(),
        });

        let result = match manager.start_upgrade(&package_id).await {
            Ok(mut stream) => {
                while let Some(line) = stream.next_line().await {
                    let _ = sender.send(Message::UpgradeOutput {
                        manager: kind,
                        request_seq,
                        package_id: package_id.clone(),
                        line,
                    });
                }
                stream.finish().await
            }
            Err(error) => Err(error),
        };

        let _ = sender.send(Message::UpgradeFinished {
            manager: kind,
            request_seq,
            package_id,
            result,
        });
    }

    let _ = sender.send(Message::BatchCompleted {
        manager: kind,
        request_seq,
    });
}
