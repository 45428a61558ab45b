use crate::error::{CoreError, Result};
use chrono::Local;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// The RES backup nests the domain filter rules under a fixed path:
// data -> filteReddit -> domains -> value.
const DATA_KEY: &str = "data";
const MODULE_KEY: &str = "filteReddit";
const OPTION_KEY: &str = "domains";
const VALUE_KEY: &str = "value";

pub const DEFAULT_SCOPE: &str = "everywhere";

/// The externally-owned RES settings backup.
///
/// Held as a whole `serde_json::Value` so that everything outside the
/// domain-rule array survives a round trip untouched. Each rule is a
/// 3-element array `[domain, scope, comment]`.
#[derive(Debug, Clone)]
pub struct FilterDocument {
    value: Value,
}

impl FilterDocument {
    /// Wrap an already-parsed document, verifying the rule path exists.
    pub fn from_value(value: Value) -> Result<Self> {
        let doc = Self { value };
        doc.rules()?;
        Ok(doc)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_value(serde_json::from_str(&raw)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.value)?;
        fs::write(path, raw).map_err(|source| CoreError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write a timestamped safety copy of this document next to `target`
    /// before the merged version overwrites anything.
    pub fn write_backup_copy(&self, target: &Path) -> Result<PathBuf> {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let name = match target.file_name().and_then(|n| n.to_str()) {
            Some(name) => format!("{}.{}.bak", name, stamp),
            None => format!("resbackup.{}.bak", stamp),
        };
        let backup = target.with_file_name(name);
        self.write(&backup)?;
        info!("Safety copy written to {}", backup.display());
        Ok(backup)
    }

    /// The domain-rule array, in document order.
    pub fn rules(&self) -> Result<&Vec<Value>> {
        self.value
            .get(DATA_KEY)
            .and_then(|v| v.get(MODULE_KEY))
            .and_then(|v| v.get(OPTION_KEY))
            .and_then(|v| v.get(VALUE_KEY))
            .and_then(Value::as_array)
            .ok_or_else(Self::missing_path)
    }

    pub fn rules_mut(&mut self) -> Result<&mut Vec<Value>> {
        self.value
            .get_mut(DATA_KEY)
            .and_then(|v| v.get_mut(MODULE_KEY))
            .and_then(|v| v.get_mut(OPTION_KEY))
            .and_then(|v| v.get_mut(VALUE_KEY))
            .and_then(Value::as_array_mut)
            .ok_or_else(Self::missing_path)
    }

    /// The registered domain strings (first element of each rule).
    pub fn domains(&self) -> Vec<String> {
        self.rules()
            .map(|rules| {
                rules
                    .iter()
                    .filter_map(|rule| rule.get(0).and_then(Value::as_str))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }

    fn missing_path() -> CoreError {
        CoreError::Malformed(format!(
            "expected an array at {}.{}.{}.{}",
            DATA_KEY, MODULE_KEY, OPTION_KEY, VALUE_KEY
        ))
    }
}
