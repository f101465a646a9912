use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ledger::Credential;
use crate::ui::messages::{info, success};

/// Store or forget the credential that authorizes ledger calls.
///
/// The interactive sign-in flow lives outside this tool; it hands over an
/// access token which is kept in the configuration file.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Auth {
        token,
        logout,
        status,
    } = cmd
    {
        if *status {
            info(format!(
                "Signed in: {}",
                if cfg.is_authorized() { "yes" } else { "no" }
            ));
            return Ok(());
        }

        let mut updated = cfg.clone();

        if *logout {
            updated.access_token = None;
            updated.save()?;
            success("Signed out.");
            return Ok(());
        }

        if let Some(t) = token {
            if Credential::new(t.as_str()).is_none() {
                return Err(AppError::Config("empty access token".into()));
            }
            updated.access_token = Some(t.trim().to_string());
            updated.save()?;
            success("Signed in.");
        }
    }

    Ok(())
}
