//! Temporary config file locations for CLI tests.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

/// A scratch directory holding a config file path that tests own.
///
/// The file itself only exists once written; the directory is removed on drop.
#[derive(Debug)]
pub struct ConfigSandbox {
    _dir: TempDir,
    path: PathBuf,
}

impl ConfigSandbox {
    /// Sandbox whose config file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn empty() -> Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().join(".devdb.yaml");
        Ok(Self { _dir: dir, path })
    }

    /// Sandbox with a config file persisting `api.url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn with_api_url(url: &str) -> Result<Self> {
        Self::with_contents(&format!("api:\n  url: {url}\n"))
    }

    /// Sandbox with a config file holding arbitrary YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn with_contents(contents: &str) -> Result<Self> {
        let sandbox = Self::empty()?;
        fs::write(&sandbox.path, contents)?;
        Ok(sandbox)
    }

    /// Config file path inside the sandbox.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.path)?)
    }
}
