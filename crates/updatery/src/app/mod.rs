//! Orchestration of scans and upgrades across the package managers.
//!
//! `Updatery` owns every `ManagerPanel` and is driven by a single foreground
//! loop: operations spawn background tasks, the tasks report back through
//! `Message`s, and `update` applies them.

mod scan;
mod upgrade;

use std::collections::HashMap;

use log::debug;
use tokio::sync::mpsc;
use updatery_backend::{PackageInfo, PackageManager};
use updatery_npm::NpmBackend;
use updatery_winget::WingetBackend;

use crate::manager_kind::ManagerKind;
use crate::message::Message;
use crate::settings::AppSettings;
use crate::state::{LogEntry, ManagerPanel, OperationKind};

pub struct Updatery {
    pub(crate) panels: HashMap<ManagerKind, ManagerPanel>,
    sender: mpsc::UnboundedSender<Message>,
    receiver: mpsc::UnboundedReceiver<Message>,
}

impl Updatery {
    /// Build both adapters from settings.
    pub fn new(settings: &AppSettings, elevated: bool) -> Self {
        let managers = ManagerKind::ALL.map(|kind| (kind, create_manager(kind, settings)));
        Self::with_managers(managers, elevated)
    }

    pub fn with_managers(
        managers: impl IntoIterator<Item = (ManagerKind, Box<dyn PackageManager>)>,
        elevated: bool,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let panels = managers
            .into_iter()
            .map(|(kind, manager)| (kind, ManagerPanel::new(kind, manager, elevated)))
            .collect();

        Self {
            panels,
            sender,
            receiver,
        }
    }

    pub fn panel(&self, kind: ManagerKind) -> Option<&ManagerPanel> {
        self.panels.get(&kind)
    }

    /// Panels in display order.
    pub fn panels(&self) -> impl Iterator<Item = &ManagerPanel> {
        ManagerKind::ALL
            .into_iter()
            .filter_map(|kind| self.panels.get(&kind))
    }

    pub fn packages(&self, kind: ManagerKind) -> &[PackageInfo] {
        self.panels
            .get(&kind)
            .map(|panel| panel.packages.as_slice())
            .unwrap_or_default()
    }

    pub fn selection(&self, kind: ManagerKind) -> &[String] {
        self.panels
            .get(&kind)
            .map(|panel| panel.selection.as_slice())
            .unwrap_or_default()
    }

    pub fn drain_log(&mut self, kind: ManagerKind) -> Vec<LogEntry> {
        self.panels
            .get_mut(&kind)
            .map(ManagerPanel::drain_log)
            .unwrap_or_default()
    }

    pub fn is_busy(&self) -> bool {
        self.panels.values().any(ManagerPanel::is_busy)
    }

    pub fn select(&mut self, kind: ManagerKind, package_id: &str) -> bool {
        self.panels
            .get_mut(&kind)
            .is_some_and(|panel| panel.select(package_id))
    }

    pub fn select_all(&mut self, kind: ManagerKind) {
        if let Some(panel) = self.panels.get_mut(&kind)
            && panel.installed
        {
            panel.select_all();
        }
    }

    /// Wait for the next message from a background task.
    pub async fn next_message(&mut self) -> Option<Message> {
        self.receiver.recv().await
    }

    pub fn update(&mut self, message: Message) {
        if self.is_stale(&message) {
            return;
        }

        match message {
            Message::ScanCompleted {
                manager,
                request_seq,
                packages,
            } => self.handle_scan_completed(manager, request_seq, packages),
            Message::UpgradeStarted {
                manager,
                package_id,
                ..
            } => self.handle_upgrade_started(manager, &package_id),
            Message::UpgradeOutput {
                manager,
                package_id,
                line,
                ..
            } => {
                self.handle_upgrade_output(manager, &package_id, line);
            }
            Message::UpgradeFinished {
                manager,
                package_id,
                result,
                ..
            } => self.handle_upgrade_finished(manager, &package_id, result),
            Message::BatchCompleted {
                manager,
                request_seq,
            } => self.handle_batch_completed(manager, request_seq),
        }
    }

    fn is_stale(&self, message: &Message) -> bool {
        let kind = message.manager();
        let Some(panel) = self.panels.get(&kind) else {
            debug!("Ignoring message for unknown manager {kind}");
            return true;
        };

        let (operation, slot) = if message.is_scan() {
            (OperationKind::Scan, &panel.scan)
        } else {
            (OperationKind::Upgrade, &panel.upgrade)
        };
        if slot.is_current(message.request_seq()) {
            return false;
        }

        debug!(
            "Ignoring stale {kind} {} result: request_seq={} current_seq={}",
            operation.as_str(),
            message.request_seq(),
            slot.request_seq()
        );
        true
    }

    /// Apply messages until no scan or upgrade is in flight, handing each
    /// manager's new log lines to `on_log` as they arrive.
    pub async fn run_until_idle(&mut self, mut on_log: impl FnMut(ManagerKind, Vec<LogEntry>)) {
        self.flush_logs(&mut on_log);
        while self.is_busy() {
            let Some(message) = self.next_message().await else {
                break;
            };
            let kind = message.manager();
            self.update(message);
            let entries = self.drain_log(kind);
            if !entries.is_empty() {
                on_log(kind, entries);
            }
        }
        self.flush_logs(&mut on_log);
    }

    fn flush_logs(&mut self, on_log: &mut impl FnMut(ManagerKind, Vec<LogEntry>)) {
        for kind in ManagerKind::ALL {
            let entries = self.drain_log(kind);
            if !entries.is_empty() {
                on_log(kind, entries);
            }
        }
    }
}

fn create_manager(kind: ManagerKind, settings: &AppSettings) -> Box<dyn PackageManager> {
    let timeout = settings.scan_timeout(kind);
    let program = settings.program_override(kind).map(std::path::Path::to_path_buf);

    match kind {
        ManagerKind::Winget => program
            .map_or_else(WingetBackend::detect, WingetBackend::new)
            .with_scan_timeout(timeout)
            .into(),
        ManagerKind::Npm => program
            .map_or_else(NpmBackend::detect, NpmBackend::new)
            .with_scan_timeout(timeout)
            .into(),
    }
}

#[cfg(test)]
mod tests;
