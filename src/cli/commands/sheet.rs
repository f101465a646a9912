use crate::cli::commands::{open_engine, runtime};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::spreadsheet::{SheetValidity, SpreadsheetRef};
use crate::ui::messages::{info, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sheet {
        select,
        name,
        clear,
        verify,
    } = cmd
    {
        let engine = open_engine(cfg)?;

        if let Some(id) = select {
            let label = name.clone().unwrap_or_else(|| id.clone());
            match engine.select_spreadsheet(SpreadsheetRef::new(id.clone(), label.clone())) {
                Ok(()) => success(format!("Spreadsheet '{}' selected.", label)),
                Err(AppError::NotAuthorized) => {
                    warning("Sign in first: rshiftclock auth --token <TOKEN>");
                }
                Err(e) => return Err(e),
            }
            return Ok(());
        }

        if *clear {
            engine.clear_spreadsheet();
            success("Spreadsheet selection cleared.");
            return Ok(());
        }

        if *verify {
            let rt = runtime()?;
            match rt.block_on(engine.verify_spreadsheet()) {
                Ok(SheetValidity::Valid) => success(format!(
                    "Spreadsheet '{}' is reachable.",
                    engine.settings().spreadsheet.display_name()
                )),
                Ok(SheetValidity::Invalid) => {
                    warning("Spreadsheet is no longer reachable; selection cleared.")
                }
                Err(AppError::SpreadsheetNotSelected) => warning("Spreadsheet not selected."),
                Err(AppError::NotAuthorized) => warning("Not signed in; nothing verified."),
                Err(e) => return Err(e),
            }
            return Ok(());
        }

        let sheet = engine.settings().spreadsheet;
        info(format!("Selected spreadsheet: {}", sheet.display_name()));
        if let Some(id) = sheet.sheet_id() {
            info(format!("Spreadsheet id: {}", id));
        }
        info(format!(
            "Signed in: {}",
            if engine.is_authorized() { "yes" } else { "no" }
        ));
    }

    Ok(())
}
