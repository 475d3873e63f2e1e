//! Spelling-variant tables for timetable names, kept as YAML data next to
//! the configuration so the office can amend them without a rebuild.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const ALIASES_VERSION: u32 = 1;

const BUILTIN_TEACHERS: &[(&str, &str)] = &[
    ("LUISA ABREU", "LUISA ELENA ABREU"),
    ("MARÍA NIETO", "MARIA NIETO"),
    ("LUIS RODRÍGUEZ", "LUIS RODRIGUEZ"),
];

const BUILTIN_SUBJECTS: &[(&str, &str)] = &[
    ("MATEMÁTICA", "MATEMÁTICAS"),
    ("MATEMATICAS", "MATEMÁTICAS"),
    ("IDIOMAS", "INGLÉS"),
    ("INGLES", "INGLÉS"),
    ("EDUCACION FISICA", "EDUCACIÓN FÍSICA"),
    ("LÓGICA MATEMÁTICA", "LOGICA MATEMÁNTICA"),
    ("LOGICA MATEMATICA", "LOGICA MATEMÁNTICA"),
    ("FÍSICA", "FISICA"),
    ("QUÍMICA", "QUIMICA"),
    ("GHC PARA LA SOBERANÍA NACIONAL", "GHC PARA LA SOBERANIA NACIONAL"),
    ("INNOVACIÓN TP", "Innovación TP"),
    ("ORIENTACIÓN VOCACIONAL", "Orientacion Vocacional"),
];

/// Upper-cased (Unicode) with inner whitespace collapsed: the key every
/// name comparison in the resolver goes through.
pub fn name_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn default_version() -> u32 {
    ALIASES_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AliasTable {
    #[serde(default = "default_version")]
    pub version: u32,
    /// variant → canonical teacher name
    #[serde(default)]
    pub teachers: BTreeMap<String, String>,
    /// variant → canonical subject name
    #[serde(default)]
    pub subjects: BTreeMap<String, String>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AliasTable {
    pub fn builtin() -> Self {
        let collect = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };
        Self {
            version: ALIASES_VERSION,
            teachers: collect(BUILTIN_TEACHERS),
            subjects: collect(BUILTIN_SUBJECTS),
        }
    }

    /// Read the alias file, or the built-in table when the file is absent.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::builtin());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AppError::ConfigLoad(format!("{}: {}", path.display(), e)))?;
        let table: AliasTable = serde_yaml::from_str(&content)
            .map_err(|e| AppError::ConfigLoad(format!("{}: {}", path.display(), e)))?;

        if table.version > ALIASES_VERSION {
            return Err(AppError::Config(format!(
                "{}: alias file version {} is newer than supported ({})",
                path.display(),
                table.version,
                ALIASES_VERSION
            )));
        }
        Ok(table)
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    pub fn teacher(&self, name: &str) -> Option<&str> {
        lookup(&self.teachers, name)
    }

    pub fn subject(&self, name: &str) -> Option<&str> {
        lookup(&self.subjects, name)
    }
}

fn lookup<'a>(map: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    let key = name_key(name);
    map.iter()
        .find(|(variant, _)| name_key(variant) == key)
        .map(|(_, canonical)| canonical.as_str())
}
