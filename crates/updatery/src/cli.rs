use clap::{Args, Parser, Subcommand};

use crate::manager_kind::ManagerKind;

/// Watch winget and npm for package updates and apply them.
#[derive(Parser, Debug)]
#[command(name = "updatery", author, version, about, long_about = None)]
pub struct Cli {
    /// Write debug output to the log file
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// The process already runs with administrator rights
    #[arg(long, global = true, env = "UPDATERY_ELEVATED")]
    pub elevated: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List package managers and whether they are installed
    Managers,

    /// Scan for packages with pending updates
    Scan {
        /// Only scan this package manager
        #[arg(short, long, value_enum)]
        manager: Option<ManagerKind>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upgrade packages, streaming the package manager's output
    Upgrade(UpgradeArgs),

    /// Show or reset settings
    Config {
        /// Overwrite the settings file with defaults
        #[arg(long)]
        write_defaults: bool,
    },
}

#[derive(Args, Debug)]
pub struct UpgradeArgs {
    /// Package manager to upgrade with
    #[arg(short, long, value_enum)]
    pub manager: ManagerKind,

    /// Upgrade every package with a pending update
    #[arg(long, conflicts_with = "ids")]
    pub all: bool,

    /// Package ids, upgraded in the order given
    #[arg(required_unless_present = "all")]
    pub ids: Vec<String>,
}
