use crate::cli::commands::{open_engine, report_sync, runtime};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Out { id } = cmd {
        let engine = open_engine(cfg)?;
        let rt = runtime()?;

        let result = rt.block_on(engine.clock_out(*id));
        report_sync(*id, result)?;
    }

    Ok(())
}
