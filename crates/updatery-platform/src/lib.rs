//! Platform helpers shared by the package manager adapters and the binary.

mod commands;
mod paths;

pub use commands::BackgroundCommand;
pub use paths::{AppPaths, AppPathsError};
