use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ManagerKind {
    Winget,
    Npm,
}

impl ManagerKind {
    pub const ALL: [Self; 2] = [Self::Winget, Self::Npm];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Winget => "winget",
            Self::Npm => "npm",
        }
    }
}

impl std::fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
