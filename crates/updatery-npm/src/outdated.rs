use serde::Deserialize;
use serde_json::{Map, Value};

use updatery_backend::PackageInfo;

/// One value of the `npm outdated --json` object. Only the two version
/// fields matter here; `wanted`, `location` and the rest are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutdatedEntry {
    #[serde(default)]
    pub current: Option<String>,
    #[serde(default)]
    pub latest: Option<String>,
}

impl OutdatedEntry {
    /// Both versions present, non-empty and different.
    fn pending_update(&self) -> Option<(&str, &str)> {
        match (self.current.as_deref(), self.latest.as_deref()) {
            (Some(current), Some(latest))
                if !current.is_empty() && !latest.is_empty() && current != latest =>
            {
                Some((current, latest))
            }
            _ => None,
        }
    }
}

/// Decode `npm outdated -g --json` output into records with a pending update.
///
/// Blank output means nothing is outdated. Values that are not objects, or
/// whose version fields are not strings, are skipped.
///
/// # Errors
/// Returns the decode error when the output is not a JSON object.
pub fn packages_from_outdated_json(stdout: &str) -> Result<Vec<PackageInfo>, serde_json::Error> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }

    let object: Map<String, Value> = serde_json::from_str(stdout)?;

    Ok(object
        .into_iter()
        .filter_map(|(name, value)| {
            let entry: OutdatedEntry = serde_json::from_value(value).ok()?;
            let (current, latest) = entry.pending_update()?;
            Some(PackageInfo::new(name.as_str(), name.as_str(), current, latest))
        })
        .collect())
}
