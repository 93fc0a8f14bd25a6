//! CLI settings resolution.
//!
//! # Responsibility
//! - Read optional `KEY=VALUE` config files.
//! - Merge file values under command-line flags into typed settings.
//!
//! # Invariants
//! - Flags always win over file values; file values win over defaults.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "weekplan.txt";

const KEY_DATA_FILE: &str = "DATA_FILE";
const KEY_LOG_DIR: &str = "LOG_DIR";
const KEY_LOG_LEVEL: &str = "LOG_LEVEL";
const KNOWN_KEYS: [&str; 3] = [KEY_DATA_FILE, KEY_LOG_DIR, KEY_LOG_LEVEL];

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    InvalidLine { line: usize, content: String },
    UnknownKey { line: usize, key: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::InvalidLine { line, content } => {
                write!(f, "invalid config line {line}: {content}")
            }
            Self::UnknownKey { line, key } => {
                write!(f, "unknown config key `{key}` on line {line}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Raw values from a config file.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses `KEY=VALUE` lines; `#` comments, blank lines and an `export `
    /// prefix are allowed, values may be quoted.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            if !KNOWN_KEYS.contains(&key) {
                return Err(ConfigError::UnknownKey {
                    line: idx + 1,
                    key: key.to_string(),
                });
            }
            values.insert(key.to_string(), unquote(value.trim()).to_string());
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Command-line overrides; `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub data_file: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Effective settings for one CLI run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_file: PathBuf,
    /// File logging is off when unset.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Settings {
    pub fn resolve(file: &AppConfig, overrides: Overrides) -> Self {
        let data_file = overrides
            .data_file
            .or_else(|| file.get(KEY_DATA_FILE).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
        let log_dir = overrides
            .log_dir
            .or_else(|| file.get(KEY_LOG_DIR).map(PathBuf::from));
        let log_level = overrides
            .log_level
            .or_else(|| file.get(KEY_LOG_LEVEL).map(str::to_string))
            .unwrap_or_else(|| weekplan_core::default_log_level().to_string());
        Self {
            data_file,
            log_dir,
            log_level,
        }
    }
}
