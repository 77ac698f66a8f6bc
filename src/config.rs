use std::{
    collections::HashMap,
    fs,
    io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use thiserror::Error;

use crate::constants::{CONFIG_KEYS, FILE_PATHS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config file is missing the '{0}' key")]
    MissingKey(&'static str),

    #[error("config file lists no categories")]
    NoCategories,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub categories: Vec<String>,
    pub display_minutes: bool,
    pub autosave_on_exit: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let properties = parse_properties(content);

        let raw_categories = properties
            .get(CONFIG_KEYS.categories)
            .ok_or(ConfigError::MissingKey(CONFIG_KEYS.categories))?;

        let mut categories: Vec<String> = Vec::new();
        for name in raw_categories.split(',').map(str::trim) {
            if !name.is_empty() && !categories.iter().any(|c| c == name) {
                categories.push(name.to_string());
            }
        }

        if categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }

        Ok(Self {
            categories,
            display_minutes: parse_flag(properties.get(CONFIG_KEYS.display_minutes)),
            autosave_on_exit: parse_flag(properties.get(CONFIG_KEYS.autosave_on_exit)),
        })
    }
}

fn parse_flag(value: Option<&String>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn parse_properties(content: &str) -> HashMap<String, String> {
    let mut properties = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let Some(split_at) = line.find(['=', ':']) else {
            properties.insert(line.to_string(), String::new());
            continue;
        };

        let key = line[..split_at].trim();
        let value = line[split_at + 1..].trim();
        properties.insert(key.to_string(), value.to_string());
    }

    properties
}

/// `./config.txt` when present, otherwise the platform config directory.
pub fn default_config_path() -> PathBuf {
    let local = PathBuf::from(FILE_PATHS.config);
    if local.exists() {
        return local;
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "worklog", "worklog") {
        let candidate = proj_dirs.config_dir().join(FILE_PATHS.config);
        if candidate.exists() {
            return candidate;
        }
    }

    local
}
