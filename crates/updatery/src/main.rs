mod app;
mod cli;
mod commands;
mod error;
mod logging;
mod manager_kind;
mod message;
mod render;
mod settings;
mod state;
#[cfg(test)]
mod test_support;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;
use crate::settings::AppSettings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = AppSettings::load();

    logging::init_logging(
        cli.debug || settings.debug_logging,
        settings.max_log_size_bytes,
    );
    log::debug!("Starting updatery {}", env!("CARGO_PKG_VERSION"));

    match commands::run(cli.command, settings, cli.elevated).await {
        Ok(code) => code,
        Err(error) => {
            log::error!("{error}");
            eprintln!("updatery: {error}");
            ExitCode::FAILURE
        }
    }
}
