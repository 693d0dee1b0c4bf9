mod app;
mod cli;
mod commands;
mod config;
mod effects;
mod logging;
mod offline;
mod render;

use clap::Parser;
use quickprint_logging::qp_info;

use self::cli::{Cli, Command};
use self::config::AppConfig;

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref());
    logging::initialize(cli.log, &config.data_dir);
    qp_info!("QuickPrint starting with data dir {:?}", config.data_dir);

    match cli.command.unwrap_or(Command::Session) {
        Command::Session => app::run_session(&config),
        Command::History { json } => offline::print_history(&config, json),
        Command::ClearHistory => offline::clear_history(&config),
        Command::Callback { url } => offline::apply_callback(&config, &url),
        Command::Config => offline::print_config(&config),
    }
}
