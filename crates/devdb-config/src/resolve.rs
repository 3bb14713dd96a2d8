//! API base URL resolution.
//!
//! Precedence: explicit flag, then `api.url` from the config file, then
//! [`DEFAULT_API_URL`]. A broken config file never blocks a command; it is
//! logged and skipped.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use url::Url;

use crate::defaults::DEFAULT_API_URL;
use crate::error::ConfigResult;
use crate::file::load_config_file;
use crate::validate::parse_api_url;

/// Where the effective API URL came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiUrlSource {
    /// `--api-url` (or its environment binding).
    Flag,
    /// `api.url` in the config file at the given path.
    ConfigFile(PathBuf),
    /// Built-in default origin.
    Default,
}

impl Display for ApiUrlSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => f.write_str("flag"),
            Self::ConfigFile(path) => write!(f, "config file ({})", path.display()),
            Self::Default => f.write_str("default"),
        }
    }
}

/// Effective API base URL together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedApiUrl {
    /// Validated base URL.
    pub url: Url,
    /// Which source supplied it.
    pub source: ApiUrlSource,
}

/// Resolve the API base URL for this invocation.
///
/// `flag` is the raw `--api-url` value; blank values count as absent.
/// `config_path` is the config file to consult, if any.
///
/// # Errors
///
/// Returns [`crate::ConfigError::InvalidApiUrl`] when the flag is present but
/// not a usable URL. Problems with the config file are logged and skipped.
pub fn resolve_api_url(flag: Option<&str>, config_path: Option<&Path>) -> ConfigResult<ResolvedApiUrl> {
    if let Some(raw) = flag.map(str::trim).filter(|value| !value.is_empty()) {
        let url = parse_api_url(raw)?;
        debug!(%url, "using API URL from flag");
        return Ok(ResolvedApiUrl {
            url,
            source: ApiUrlSource::Flag,
        });
    }

    if let Some(path) = config_path
        && let Some(url) = url_from_config_file(path)
    {
        debug!(%url, path = %path.display(), "using API URL from config file");
        return Ok(ResolvedApiUrl {
            url,
            source: ApiUrlSource::ConfigFile(path.to_path_buf()),
        });
    }

    Ok(ResolvedApiUrl {
        url: parse_api_url(DEFAULT_API_URL)?,
        source: ApiUrlSource::Default,
    })
}

fn url_from_config_file(path: &Path) -> Option<Url> {
    let file = match load_config_file(path) {
        Ok(Some(file)) => file,
        Ok(None) => return None,
        Err(err) => {
            warn!(error = %err, "ignoring unreadable config file");
            return None;
        }
    };
    let raw = file.api_url()?;
    match parse_api_url(raw) {
        Ok(url) => Some(url),
        Err(err) => {
            warn!(error = %err, path = %path.display(), "ignoring api.url from config file");
            None
        }
    }
}
