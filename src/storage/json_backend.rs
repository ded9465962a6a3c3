use std::{
    env, fs,
    io::Write,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::{
    domain::{family::CURRENT_SCHEMA_VERSION, Cadence, FamilyLedger},
    errors::StoreError,
};

use super::{FamilyStore, LoadReport, Result};

const DEFAULT_DIR_NAME: &str = ".period_core";
const FAMILIES_DIR: &str = "families";
const TMP_SUFFIX: &str = "tmp";

/// One JSON file per family under `$PERIOD_CORE_HOME` (default
/// `~/.period_core/families`). Saves go through a temp file and an atomic
/// rename, so readers only ever see fully-old or fully-new state.
#[derive(Clone)]
pub struct JsonStorage {
    families_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(default_root);
        let families_dir = root.join(FAMILIES_DIR);
        fs::create_dir_all(&families_dir)?;
        Ok(Self { families_dir })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn family_path(&self, name: &str) -> PathBuf {
        self.families_dir
            .join(format!("{}.json", canonical_name(name)))
    }

    fn write_atomically(&self, path: &Path, data: &str) -> Result<()> {
        let tmp = path.with_extension(TMP_SUFFIX);
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(data.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl FamilyStore for JsonStorage {
    fn load(&self, name: &str) -> Result<LoadReport> {
        let path = self.family_path(name);
        if !path.exists() {
            return Err(StoreError::UnknownFamily(name.to_string()));
        }
        let raw = fs::read_to_string(&path)?;
        let mut value: Value = serde_json::from_str(&raw)?;
        let migrations = repair_cadence_tag(&mut value);

        if let Some(version) = value.get("schema_version").and_then(Value::as_u64) {
            if version > CURRENT_SCHEMA_VERSION as u64 {
                return Err(StoreError::Persistence(format!(
                    "family schema v{} is newer than supported v{}",
                    version, CURRENT_SCHEMA_VERSION
                )));
            }
        }

        let family: FamilyLedger = serde_json::from_value(value)?;
        if !migrations.is_empty() {
            for note in &migrations {
                tracing::warn!(family = name, "{note}");
            }
            // Persist the repaired form so the fault does not resurface.
            self.save(&family, name)?;
        }
        Ok(LoadReport {
            family,
            migrations,
            path,
        })
    }

    fn save(&self, family: &FamilyLedger, name: &str) -> Result<PathBuf> {
        let path = self.family_path(name);
        let data = serde_json::to_string_pretty(family)?;
        self.write_atomically(&path, &data)?;
        Ok(path)
    }

    fn exists(&self, name: &str) -> bool {
        self.family_path(name).exists()
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.families_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

fn default_root() -> PathBuf {
    if let Some(custom) = env::var_os("PERIOD_CORE_HOME") {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

fn canonical_name(name: &str) -> String {
    name.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Normalizes the stored cadence tag in place. Legacy spellings map onto the
/// canonical tag; an unrecognized value is a recoverable data-integrity fault
/// and defaults to Monthly. Returns the repair notes.
fn repair_cadence_tag(value: &mut Value) -> Vec<String> {
    let mut migrations = Vec::new();
    let Some(tag) = value
        .pointer("/configuration/cadence")
        .and_then(Value::as_str)
        .map(str::to_string)
    else {
        return migrations;
    };
    let canonical = match Cadence::from_tag(&tag) {
        Some(cadence) => {
            if cadence.tag() == tag {
                return migrations;
            }
            migrations.push(format!(
                "normalized legacy cadence tag `{tag}` to `{}`",
                cadence.tag()
            ));
            cadence.tag()
        }
        None => {
            migrations.push(format!(
                "unknown cadence `{tag}` defaulted to `{}`",
                Cadence::Monthly.tag()
            ));
            Cadence::Monthly.tag()
        }
    };
    if let Some(slot) = value.pointer_mut("/configuration/cadence") {
        *slot = Value::String(canonical.to_string());
    }
    migrations
}
