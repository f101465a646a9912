use crate::cli::commands::open_engine;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use crate::utils::time::format_local_time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::In { name } = cmd {
        let engine = open_engine(cfg)?;
        let joined = name.join(" ");

        match engine.clock_in(&joined) {
            Ok(id) => {
                let since = engine
                    .entry(id)
                    .map(|e| format_local_time(e.clock_in_at))
                    .unwrap_or_default();
                success(format!("{} clocked in at {} (shift #{}).", joined.trim(), since, id));
            }
            // nothing was changed; not worth an error exit
            Err(AppError::Validation) => warning("A name is required to clock in."),
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
