use async_trait::async_trait;

use crate::error::BackendError;
use crate::stream::UpgradeStream;
use crate::types::{PackageInfo, UpgradeOutcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManagerCapabilities {
    /// Upgrades usually need an elevated process; the front end warns when it
    /// was not started with one.
    pub requires_elevation: bool,
}

/// Uniform contract over one external package manager.
#[async_trait]
pub trait PackageManager: Send + Sync + PackageManagerClone {
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> ManagerCapabilities;

    /// Whether the backing executable resolves in this environment.
    fn is_installed(&self) -> bool;

    /// Packages with a pending update. Every failure yields an empty list.
    async fn scan(&self) -> Vec<PackageInfo>;

    /// Start upgrading exactly one package.
    ///
    /// # Errors
    /// Returns an error if the upgrade process cannot be started.
    async fn start_upgrade(&self, package_id: &str) -> Result<UpgradeStream, BackendError>;

    /// Upgrade one package and wait for it, returning the exit code and the
    /// combined output.
    ///
    /// # Errors
    /// Returns an error if the upgrade process cannot be started or awaited.
    async fn upgrade(&self, package_id: &str) -> Result<UpgradeOutcome, BackendError> {
        self.start_upgrade(package_id).await?.finish().await
    }

    fn translate_exit_code(&self, code: i64) -> String;
}

pub trait PackageManagerClone: Send + Sync {
    fn clone_box(&self) -> Box<dyn PackageManager>;
}

impl<T> PackageManagerClone for T
where
    T: 'static + PackageManager + Clone,
{
    fn clone_box(&self) -> Box<dyn PackageManager> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn PackageManager> {
    fn clone(&self) -> Box<dyn PackageManager> {
        self.clone_box()
    }
}

impl<T: PackageManager + Clone + 'static> From<T> for Box<dyn PackageManager> {
    fn from(manager: T) -> Self {
        Box::new(manager)
    }
}
