use crate::errors::{AppError, AppResult};
use crate::ledger::Credential;
use crate::ledger::sheets::{DEFAULT_API_BASE, DEFAULT_TARGET_RANGE};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_api_base")]
    pub sheets_api_base: String,
    #[serde(default = "default_target_range")]
    pub target_range: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}
fn default_target_range() -> String {
    DEFAULT_TARGET_RANGE.to_string()
}
fn default_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            sheets_api_base: default_api_base(),
            target_range: default_target_range(),
            request_timeout_secs: default_timeout(),
            access_token: None,
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rshiftclock")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rshiftclock")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rshiftclock.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rshiftclock.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            Self::from_yaml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Write the configuration file, creating its directory.
    pub fn save(&self) -> AppResult<()> {
        fs::create_dir_all(Self::config_dir()).map_err(|_| AppError::ConfigSave)?;
        let yaml = serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))?;
        let mut file = fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
        file.write_all(yaml.as_bytes())
            .map_err(|_| AppError::ConfigSave)?;
        Ok(())
    }

    /// The sign-in credential, if any. Its presence is the authorized signal.
    pub fn credential(&self) -> Option<Credential> {
        self.access_token.as_deref().and_then(Credential::new)
    }

    pub fn is_authorized(&self) -> bool {
        self.credential().is_some()
    }

    /// Copy safe to print: the access token is masked.
    pub fn redacted(&self) -> Self {
        let mut out = self.clone();
        if out.access_token.is_some() {
            out.access_token = Some("********".to_string());
        }
        out
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            dir.join("rshiftclock.sqlite")
        };

        // Keep an existing token and endpoint when re-initializing
        let mut config = Self::load().unwrap_or_default();
        config.database = db_path.to_string_lossy().to_string();

        if !is_test {
            config.save()?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        Ok(db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_fills_defaults() {
        let cfg = Config::from_yaml("database: /tmp/x.sqlite\nunknown_key: 1\n").expect("parse");
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.target_range, "Sheet1!A1");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert!(!cfg.is_authorized());
    }

    #[test]
    fn blank_token_is_not_authorized() {
        let cfg = Config::from_yaml("access_token: '  '\n").expect("parse");
        assert!(!cfg.is_authorized());

        let cfg = Config::from_yaml("access_token: ya29.token\n").expect("parse");
        assert!(cfg.is_authorized());
        assert_eq!(cfg.redacted().access_token.as_deref(), Some("********"));
    }
}
