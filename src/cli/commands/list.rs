use crate::cli::commands::open_engine;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::{colorize_optional, colorize_state};
use crate::utils::table::Table;
use crate::utils::time::{format_duration, format_local_time, now_millis};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::List) {
        let engine = open_engine(cfg)?;
        let entries = engine.entries();
        let settings = engine.settings();

        header(format!(
            "Roster ({}) → spreadsheet: {}",
            entries.len(),
            settings.spreadsheet.display_name()
        ));

        if entries.is_empty() {
            info("Nobody is clocked in.");
            return Ok(());
        }

        let now = now_millis();
        let mut table = Table::new(["ID", "Name", "In", "Out", "Elapsed", "State"]);
        for e in &entries {
            let out = e
                .clock_out_at
                .map(format_local_time)
                .unwrap_or_else(|| "--:--".to_string());
            let elapsed = e.clock_out_at.unwrap_or(now) - e.clock_in_at;
            table.add_row(vec![
                e.id.to_string(),
                e.name.clone(),
                format_local_time(e.clock_in_at),
                colorize_optional(&out),
                format_duration(elapsed),
                colorize_state(e.state()),
            ]);
        }

        print!("{}", table.render());
    }

    Ok(())
}
