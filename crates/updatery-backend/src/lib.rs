//! Package manager contract shared by the winget and npm adapters.
//!
//! - [`PackageManager`]: the capability trait every adapter implements.
//! - [`PackageInfo`]: one package with a pending update.
//! - [`ExitCodeTable`]: per-adapter exit code to message lookup.
//! - [`UpgradeStream`]: a running upgrade child with merged, line-by-line
//!   output.

mod error;
mod exit_codes;
mod stream;
mod traits;
mod types;

pub use error::{BackendError, ScanError};
pub use exit_codes::{ExitCodeTable, ExitCodeTableBuilder};
pub use stream::UpgradeStream;
pub use traits::{ManagerCapabilities, PackageManager, PackageManagerClone};
pub use types::{PackageInfo, UpgradeOutcome};
