use std::path::PathBuf;
use which::which;

pub(crate) const NPM_PROGRAM: &str = "npm";

/// Resolve npm to a full path. On Windows this finds `npm.cmd`, which a bare
/// `npm` cannot be spawned as.
pub(crate) fn detect_npm() -> Option<PathBuf> {
    if let Ok(path) = which(NPM_PROGRAM) {
        return Some(path);
    }

    common_npm_paths().into_iter().find(|path| path.exists())
}

fn common_npm_paths() -> Vec<PathBuf> {
    if cfg!(windows) {
        vec![PathBuf::from(r"C:\Program Files\nodejs\npm.cmd")]
    } else {
        vec![
            PathBuf::from("/usr/local/bin/npm"),
            PathBuf::from("/opt/homebrew/bin/npm"),
            PathBuf::from("/usr/bin/npm"),
        ]
    }
}
