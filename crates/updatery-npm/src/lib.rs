mod backend;
mod detection;
mod exit_codes;
mod outdated;

pub use backend::{DEFAULT_SCAN_TIMEOUT, NpmBackend};
pub use outdated::{OutdatedEntry, packages_from_outdated_json};
