use std::path::PathBuf;
use which::which;

pub(crate) const WINGET_PROGRAM: &str = "winget";

/// Locate winget, falling back to the App Installer alias directory, which is
/// missing from `PATH` in some elevated shells.
pub(crate) fn detect_winget() -> Option<PathBuf> {
    if let Ok(path) = which(WINGET_PROGRAM) {
        return Some(path);
    }

    common_winget_paths().into_iter().find(|path| path.exists())
}

fn common_winget_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(local_app_data) = dirs::data_local_dir() {
        paths.push(
            local_app_data
                .join("Microsoft")
                .join("WindowsApps")
                .join("winget.exe"),
        );
    }

    paths
}
