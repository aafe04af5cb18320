use updatery_backend::{PackageInfo, PackageManager};

use super::OperationSlot;
use crate::manager_kind::ManagerKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
    /// A line printed by an upgrade child.
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub text: String,
}

/// Everything the front end shows for one package manager.
pub struct ManagerPanel {
    pub kind: ManagerKind,
    pub manager: Box<dyn PackageManager>,
    pub installed: bool,
    pub packages: Vec<PackageInfo>,
    pub selection: Vec<String>,
    pub scan: OperationSlot,
    pub upgrade: OperationSlot,
    log: Vec<LogEntry>,
}

impl std::fmt::Debug for ManagerPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerPanel")
            .field("kind", &self.kind)
            .field("installed", &self.installed)
            .field("packages", &self.packages.len())
            .field("selection", &self.selection)
            .field("scan", &self.scan)
            .field("upgrade", &self.upgrade)
            .finish_non_exhaustive()
    }
}

impl ManagerPanel {
    pub fn new(kind: ManagerKind, manager: Box<dyn PackageManager>, elevated: bool) -> Self {
        let installed = manager.is_installed();
        let mut panel = Self {
            kind,
            manager,
            installed,
            packages: Vec::new(),
            selection: Vec::new(),
            scan: OperationSlot::default(),
            upgrade: OperationSlot::default(),
            log: Vec::new(),
        };

        if installed && panel.manager.capabilities().requires_elevation && !elevated {
            panel.push_log(
                LogLevel::Warning,
                format!(
                    "Warning: Not running as admin. Some {} upgrades may fail or prompt \
                     for elevation. Re-run as Administrator for best results.",
                    panel.manager.name()
                ),
            );
        }

        panel
    }

    pub fn name(&self) -> &'static str {
        self.manager.name()
    }

    pub fn push_log(&mut self, level: LogLevel, text: impl Into<String>) {
        let text = text.into();
        match level {
            LogLevel::Warning | LogLevel::Error => log::warn!("[{}] {text}", self.kind),
            LogLevel::Output => log::trace!("[{}] {text}", self.kind),
            LogLevel::Info | LogLevel::Success => log::debug!("[{}] {text}", self.kind),
        }
        self.log.push(LogEntry { level, text });
    }

    pub fn drain_log(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.log)
    }

    pub fn is_busy(&self) -> bool {
        self.scan.is_busy() || self.upgrade.is_busy()
    }

    /// Replace the package list, dropping selections that are no longer
    /// listed.
    pub fn set_packages(&mut self, packages: Vec<PackageInfo>) {
        self.packages = packages;
        let packages = &self.packages;
        self.selection
            .retain(|id| packages.iter().any(|package| &package.package_id == id));
    }

    /// Add a listed package to the end of the selection.
    pub fn select(&mut self, package_id: &str) -> bool {
        let listed = self
            .packages
            .iter()
            .any(|package| package.package_id == package_id);
        if !listed || self.is_selected(package_id) {
            return false;
        }
        self.selection.push(package_id.to_string());
        true
    }

    pub fn deselect(&mut self, package_id: &str) -> bool {
        let before = self.selection.len();
        self.selection.retain(|id| id != package_id);
        self.selection.len() != before
    }

    /// Select every listed package, in list order.
    pub fn select_all(&mut self) {
        self.selection.clear();
        for package in &self.packages {
            if !self.selection.contains(&package.package_id) {
                self.selection.push(package.package_id.clone());
            }
        }
    }

    pub fn is_selected(&self, package_id: &str) -> bool {
        self.selection.iter().any(|id| id == package_id)
    }

    /// Forget a package after it was upgraded successfully.
    pub fn remove_package(&mut self, package_id: &str) {
        self.packages
            .retain(|package| package.package_id != package_id);
        self.deselect(package_id);
    }
}
