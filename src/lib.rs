//! rShiftClock library root.
//! Exposes the CLI parser, the shift engine and its collaborators, and the
//! high-level run() function used by main.rs.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod ledger;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::In { .. } => cli::commands::clock_in::handle(&cli.command, cfg),
        Commands::Select { .. } => cli::commands::select::handle(&cli.command, cfg),
        Commands::Out { .. } => cli::commands::clock_out::handle(&cli.command, cfg),
        Commands::Retry { .. } => cli::commands::retry::handle(&cli.command, cfg),
        Commands::Cancel { .. } => cli::commands::cancel::handle(&cli.command, cfg),
        Commands::List => cli::commands::list::handle(&cli.command, cfg),
        Commands::Sheet { .. } => cli::commands::sheet::handle(&cli.command, cfg),
        Commands::Dark { .. } => cli::commands::dark::handle(&cli.command, cfg),
        Commands::Auth { .. } => cli::commands::auth::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // configuration is loaded once and handed to every handler
    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
