use crate::cli::commands::open_engine;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{set_dark_mode, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Dark { on, off } = cmd {
        let engine = open_engine(cfg)?;

        let dark = if *on {
            engine.set_dark(true);
            true
        } else if *off {
            engine.set_dark(false);
            false
        } else {
            engine.toggle_dark()
        };

        set_dark_mode(dark);
        success(format!("Dark mode {}.", if dark { "on" } else { "off" }));
    }

    Ok(())
}
