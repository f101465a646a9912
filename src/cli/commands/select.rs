use crate::cli::commands::open_engine;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::colors::colorize_state;
use crate::utils::time::format_local_timestamp;

/// Display one roster entry.
///
/// The engine's current selection is process memory and is not persisted,
/// so from the CLI this is a read-only view.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Select { id } = cmd {
        let engine = open_engine(cfg)?;
        let entry = engine.select(*id)?;

        info(format!(
            "#{} {}: clocked in since {} [{}]",
            entry.id,
            entry.name,
            format_local_timestamp(entry.clock_in_at),
            colorize_state(entry.state())
        ));
        if let Some(out) = entry.clock_out_at {
            info(format!("Clocked out at {}", format_local_timestamp(out)));
        }
    }

    Ok(())
}
