use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::store::SqliteStore;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let store = SqliteStore::open_path(&cfg.database)?;
        LogLogic::print_log(store.pool())?;
    }

    Ok(())
}
