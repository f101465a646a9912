use crate::cli::commands::{open_engine, report_sync, runtime};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Retry { id, all } = cmd {
        let engine = open_engine(cfg)?;
        let rt = runtime()?;

        if *all {
            let results = rt.block_on(engine.retry_all());
            if results.is_empty() {
                info("No pending shifts.");
            }
            for (id, result) in results {
                report_sync(id, result)?;
            }
        } else if let Some(id) = id {
            let result = rt.block_on(engine.retry(*id));
            report_sync(*id, result)?;
        }
    }

    Ok(())
}
