use crate::config::Config;
use crate::config::migrate::{migrate_missing_fields, missing_fields};
use crate::core::aliases::AliasTable;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};

use crate::cli::parser::Commands;
use std::path::Path;
use std::process::Command;

/// `config`: inspect, upgrade or edit the configuration file.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
        init_aliases,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            println!("📄 Current configuration:\n");
            let yaml = serde_yaml::to_string(cfg).map_err(|_| AppError::ConfigSave)?;
            println!("{}", yaml);
        }

        if *check {
            cfg.validate()?;
            if !path.exists() {
                warning(format!(
                    "No configuration file at {}; defaults are in use.",
                    path.display()
                ));
            } else {
                let missing = missing_fields(&path)?;
                if missing.is_empty() {
                    success("Configuration file is complete.");
                } else {
                    warning(format!("Missing fields: {}", missing.join(", ")));
                    info("Run `rollbook config --migrate` to add them with default values.");
                }
            }
        }

        if *migrate {
            if !path.exists() {
                return Err(AppError::ConfigLoad(format!(
                    "{}: not found, run `rollbook init` first",
                    path.display()
                )));
            }
            migrate_missing_fields(&path)?;
        }

        if *init_aliases {
            let aliases_path = cfg.aliases_path();
            if aliases_path.exists() {
                warning(format!(
                    "Aliases file already exists, left untouched: {}",
                    aliases_path.display()
                ));
            } else {
                AliasTable::builtin().save(&aliases_path)?;
                success(format!("Aliases written to {}", aliases_path.display()));
            }
        }

        if *edit_config {
            let used = open_in_editor(&path, editor.as_deref())?;
            success(format!("Configuration edited with '{used}'"));
        }
    }

    Ok(())
}

/// Try the requested editor, then $EDITOR / $VISUAL, then the platform
/// default. Returns the editor that exited successfully.
fn open_in_editor(path: &Path, requested: Option<&str>) -> AppResult<String> {
    let platform = if cfg!(target_os = "windows") { "notepad" } else { "nano" };
    let candidates: Vec<String> = requested
        .map(str::to_string)
        .into_iter()
        .chain(std::env::var("EDITOR").ok())
        .chain(std::env::var("VISUAL").ok())
        .chain(Some(platform.to_string()))
        .collect();

    for candidate in &candidates {
        match Command::new(candidate).arg(path).status() {
            Ok(status) if status.success() => return Ok(candidate.clone()),
            _ => warning(format!("Editor '{candidate}' failed or is not installed")),
        }
    }

    Err(AppError::Config(format!(
        "No working editor among: {}",
        candidates.join(", ")
    )))
}
