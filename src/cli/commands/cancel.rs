use crate::cli::commands::open_engine;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Cancel { id, yes } = cmd {
        let engine = open_engine(cfg)?;

        // an unknown id is audited as a stale reference by the engine
        let entry = engine.select(*id)?;

        if !*yes {
            let prompt = if entry.is_clocked_out() {
                format!(
                    "Cancel shift #{} for {}? It is clocked out but NOT recorded in the spreadsheet.",
                    id, entry.name
                )
            } else {
                format!("Cancel shift #{} for {}?", id, entry.name)
            };
            if !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return Ok(());
            }
        }

        let removed = engine.cancel(*id)?;
        success(format!("Shift #{} for {} removed.", removed.id, removed.name));
    }

    Ok(())
}
