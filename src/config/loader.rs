//! Configuration loading

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{MirrorError, MirrorResult};

use super::types::{Config, Defaults, MirrorSection};

/// Non-fatal configuration warning surfaced on stderr (e.g. unknown keys).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    /// Section label the key appeared in, if any
    pub section: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.section {
            Some(section) => write!(f, "unknown key '{}' in [mirror.{}]", self.key, section),
            None => write!(f, "unknown key '{}'", self.key),
        }
    }
}

impl Config {
    /// Load configuration and collect non-fatal warnings.
    pub fn load(path: &Path) -> MirrorResult<(Config, Vec<ConfigWarning>)> {
        let content = fs::read_to_string(path).map_err(|e| MirrorError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        parse(&content).map_err(|message| MirrorError::ConfigParse {
            path: path.to_path_buf(),
            message,
        })
    }
}

/// Parse configuration text. Mirror sections keep file order, which fixes
/// the order targets are synced in.
pub(crate) fn parse(content: &str) -> Result<(Config, Vec<ConfigWarning>), String> {
    let doc: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;

    let mut warnings = Vec::new();
    let mut defaults = Defaults::default();
    let mut mirrors = Vec::new();

    for (key, value) in doc {
        match key.as_str() {
            "defaults" => {
                defaults = deserialize_section(value, None, &mut warnings)?;
            }
            "mirror" => {
                let toml::Value::Table(sections) = value else {
                    return Err("'mirror' must be a table of sections".to_string());
                };
                for (label, section_value) in sections {
                    let section: MirrorSection =
                        deserialize_section(section_value, Some(&label), &mut warnings)
                            .map_err(|e| format!("section '{label}': {e}"))?;
                    mirrors.push((label, section));
                }
            }
            other => warnings.push(ConfigWarning {
                key: other.to_string(),
                section: None,
            }),
        }
    }

    Ok((Config { defaults, mirrors }, warnings))
}

/// Deserialize one table, recording unknown keys as warnings instead of
/// rejecting the section.
fn deserialize_section<T: DeserializeOwned>(
    value: toml::Value,
    section: Option<&str>,
    warnings: &mut Vec<ConfigWarning>,
) -> Result<T, String> {
    serde_ignored::deserialize(value, |path| {
        warnings.push(ConfigWarning {
            key: path.to_string(),
            section: section.map(str::to_string),
        });
    })
    .map_err(|e: toml::de::Error| e.message().to_string())
}
