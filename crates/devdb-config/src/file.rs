//! Per-user YAML config file (`~/.devdb.yaml`).
//!
//! # Design
//! - Reading is strict: callers decide whether a malformed file is fatal.
//! - Writing rewrites only `api.url` and preserves every other key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use url::Url;

use crate::defaults::CONFIG_FILE_NAME;
use crate::error::{ConfigError, ConfigResult};

/// Typed view of the keys the CLI reads from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// `api:` section.
    #[serde(default)]
    pub api: ApiSection,
}

/// `api:` section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSection {
    /// Persisted API base URL (`api.url`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ConfigFile {
    /// Stored API URL, if present and not blank.
    #[must_use]
    pub fn api_url(&self) -> Option<&str> {
        self.api
            .url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Location of the config file in the current user's home directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Load the config file at `path`.
///
/// Returns `Ok(None)` when the file does not exist. An empty file is treated as
/// a document with no keys.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML of the
/// expected shape.
pub fn load_config_file(path: &Path) -> ConfigResult<Option<ConfigFile>> {
    let Some(text) = read_optional(path)? else {
        return Ok(None);
    };
    if text.trim().is_empty() {
        return Ok(Some(ConfigFile::default()));
    }
    serde_yaml::from_str(&text)
        .map(Some)
        .map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

/// Persist `url` as `api.url` in the config file at `path`.
///
/// Creates the file (and its parent directories) when missing.
///
/// # Errors
///
/// Returns an error if the existing file is malformed, or if the file cannot
/// be encoded or written.
pub fn store_api_url(path: &Path, url: &Url) -> ConfigResult<()> {
    let mut document = match read_optional(path)? {
        Some(text) if !text.trim().is_empty() => {
            serde_yaml::from_str::<Value>(&text).map_err(|source| ConfigError::Malformed {
                path: path.to_path_buf(),
                source,
            })?
        }
        _ => Value::Mapping(Mapping::new()),
    };

    let Value::Mapping(root) = &mut document else {
        return Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        });
    };
    let api = root
        .entry(Value::String("api".into()))
        .or_insert(Value::Mapping(Mapping::new()));
    if !api.is_mapping() {
        *api = Value::Mapping(Mapping::new());
    }
    if let Value::Mapping(section) = api {
        section.insert(
            Value::String("url".into()),
            Value::String(url.as_str().to_string()),
        );
    }

    let encoded = serde_yaml::to_string(&document).map_err(|source| ConfigError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, encoded).map_err(|source| ConfigError::Io {
        operation: "write",
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional(path: &Path) -> ConfigResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source,
        }),
    }
}
