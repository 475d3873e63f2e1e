use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod migrate; // use submodule at src/config/migrate.rs

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_academic_year")]
    pub academic_year: String,
    #[serde(default = "default_tenant_id")]
    pub tenant_id: i64,
    #[serde(default = "default_commit_batch_size")]
    pub commit_batch_size: usize,
    #[serde(default = "default_section_capacity")]
    pub default_section_capacity: i64,
    #[serde(default = "default_roster_skip_rows")]
    pub roster_skip_rows: usize,
    #[serde(default = "default_schedule_header_rows")]
    pub schedule_header_rows: usize,
    #[serde(default = "default_calculated_by")]
    pub calculated_by: String,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    #[serde(default = "default_aliases_file")]
    pub aliases_file: String,
    #[serde(default = "default_alert_days_back")]
    pub alert_days_back: i64,
    #[serde(default = "default_alert_min_days")]
    pub alert_min_days: i64,
    #[serde(default = "default_alert_warning_below")]
    pub alert_warning_below: f64,
    #[serde(default = "default_alert_critical_below")]
    pub alert_critical_below: f64,
}

fn default_academic_year() -> String {
    "2025-2026".to_string()
}
fn default_tenant_id() -> i64 {
    1
}
fn default_commit_batch_size() -> usize {
    50
}
fn default_section_capacity() -> i64 {
    35
}
fn default_roster_skip_rows() -> usize {
    2
}
fn default_schedule_header_rows() -> usize {
    2
}
fn default_calculated_by() -> String {
    "system_auto".to_string()
}
fn default_aliases_file() -> String {
    Config::config_dir()
        .join("aliases.yaml")
        .to_string_lossy()
        .to_string()
}
fn default_alert_days_back() -> i64 {
    30
}
fn default_alert_min_days() -> i64 {
    10
}
fn default_alert_warning_below() -> f64 {
    80.0
}
fn default_alert_critical_below() -> f64 {
    70.0
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            academic_year: default_academic_year(),
            tenant_id: default_tenant_id(),
            commit_batch_size: default_commit_batch_size(),
            default_section_capacity: default_section_capacity(),
            roster_skip_rows: default_roster_skip_rows(),
            schedule_header_rows: default_schedule_header_rows(),
            calculated_by: default_calculated_by(),
            holidays: Vec::new(),
            aliases_file: default_aliases_file(),
            alert_days_back: default_alert_days_back(),
            alert_min_days: default_alert_min_days(),
            alert_warning_below: default_alert_warning_below(),
            alert_critical_below: default_alert_critical_below(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rollbook")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rollbook")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rollbook.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rollbook.sqlite")
    }

    /// Aliases file with `~` expanded.
    pub fn aliases_path(&self) -> PathBuf {
        expand_tilde(&self.aliases_file)
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| AppError::ConfigLoad(format!("{}: {}", path.display(), e)))?;
        let mut cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::ConfigLoad(format!("{}: {}", path.display(), e)))?;

        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    /// Validate the values that the import and aggregation code relies on.
    pub fn validate(&self) -> AppResult<()> {
        crate::utils::date::parse_academic_year(&self.academic_year)?;

        if self.commit_batch_size == 0 {
            return Err(AppError::Config(
                "commit_batch_size must be greater than 0".into(),
            ));
        }
        if self.alert_critical_below > self.alert_warning_below {
            return Err(AppError::Config(
                "alert_critical_below must not exceed alert_warning_below".into(),
            ));
        }
        Ok(())
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
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            if let Some(parent) = db_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::File::create(&db_path).map_err(|e| {
                io::Error::new(e.kind(), format!("{}: {}", db_path.display(), e))
            })?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_path)
    }
}
