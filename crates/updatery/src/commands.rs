use std::collections::BTreeMap;
use std::process::ExitCode;

use log::info;
use updatery_backend::PackageInfo;
use updatery_platform::AppPaths;

use crate::app::Updatery;
use crate::cli::{Command, UpgradeArgs};
use crate::error::AppError;
use crate::manager_kind::ManagerKind;
use crate::render;
use crate::settings::AppSettings;
use crate::state::LogEntry;

pub async fn run(
    command: Command,
    settings: AppSettings,
    elevated: bool,
) -> Result<ExitCode, AppError> {
    match command {
        Command::Managers => {
            managers(&settings, elevated);
            Ok(ExitCode::SUCCESS)
        }
        Command::Scan { manager, json } => scan(&settings, elevated, manager, json).await,
        Command::Upgrade(args) => upgrade(&settings, elevated, args).await,
        Command::Config { write_defaults } => config(&settings, write_defaults),
    }
}

fn print_log(kind: ManagerKind, entries: Vec<LogEntry>) {
    for entry in &entries {
        eprintln!("{}", render::log_line(kind, entry));
    }
}

fn managers(settings: &AppSettings, elevated: bool) {
    let app = Updatery::new(settings, elevated);
    for panel in app.panels() {
        println!("{}", render::manager_line(panel));
    }
}

async fn scan(
    settings: &AppSettings,
    elevated: bool,
    only: Option<ManagerKind>,
    json: bool,
) -> Result<ExitCode, AppError> {
    let mut app = Updatery::new(settings, elevated);
    let kinds: Vec<ManagerKind> = only.map_or_else(|| ManagerKind::ALL.to_vec(), |kind| vec![kind]);

    for &kind in &kinds {
        app.refresh(kind);
    }
    app.run_until_idle(print_log).await;

    if json {
        let report: BTreeMap<ManagerKind, &[PackageInfo]> =
            kinds.iter().map(|&kind| (kind, app.packages(kind))).collect();
        let text = serde_json::to_string_pretty(&report)
            .map_err(|error| AppError::output_failed("JSON", error))?;
        println!("{text}");
        return Ok(ExitCode::SUCCESS);
    }

    for &kind in &kinds {
        let packages = app.packages(kind);
        if packages.is_empty() {
            continue;
        }
        println!("{kind}:");
        print!("{}", render::package_table(packages));
        println!();
    }
    Ok(ExitCode::SUCCESS)
}

async fn upgrade(
    settings: &AppSettings,
    elevated: bool,
    args: UpgradeArgs,
) -> Result<ExitCode, AppError> {
    let kind = args.manager;
    let mut app = Updatery::new(settings, elevated);
    let manager = kind.as_str();

    if !app.panel(kind).is_some_and(|panel| panel.installed) {
        app.refresh(kind);
        app.run_until_idle(print_log).await;
        return Err(AppError::ManagerNotInstalled { manager });
    }

    app.refresh(kind);
    app.run_until_idle(print_log).await;

    let skipped = select_requested(&mut app, kind, &args);
    for package_id in &skipped {
        eprintln!("[{kind}] warning: {package_id} has no pending update, skipping");
    }

    info!("Upgrading {:?} with {kind}", app.selection(kind));
    app.upgrade_selected(kind);
    app.run_until_idle(print_log).await;

    upgrade_status(manager, app.selection(kind).len(), skipped)
}

/// Select what the command line asked for. Returns the requested ids that
/// have no pending update.
fn select_requested(app: &mut Updatery, kind: ManagerKind, args: &UpgradeArgs) -> Vec<String> {
    if args.all {
        app.select_all(kind);
        return Vec::new();
    }

    args.ids
        .iter()
        .filter(|package_id| !app.select(kind, package_id))
        .cloned()
        .collect()
}

fn upgrade_status(
    manager: &'static str,
    remaining: usize,
    skipped: Vec<String>,
) -> Result<ExitCode, AppError> {
    if remaining > 0 {
        return Err(AppError::UpgradesFailed { manager, remaining });
    }
    if !skipped.is_empty() {
        return Err(AppError::PackagesSkipped {
            manager,
            package_ids: skipped,
        });
    }
    Ok(ExitCode::SUCCESS)
}

fn config(settings: &AppSettings, write_defaults: bool) -> Result<ExitCode, AppError> {
    let paths = AppPaths::new().map_err(AppError::settings_unavailable)?;

    let shown = if write_defaults {
        let defaults = AppSettings::default();
        let path = defaults.save().map_err(AppError::settings_save_failed)?;
        println!("Wrote default settings to {}", path.display());
        defaults
    } else {
        settings.clone()
    };

    println!("Settings file: {}", paths.settings_file().display());
    println!("Log file: {}", paths.log_file().display());
    let text = serde_json::to_string_pretty(&shown)
        .map_err(|error| AppError::output_failed("JSON", error))?;
    println!("{text}");
    Ok(ExitCode::SUCCESS)
}
