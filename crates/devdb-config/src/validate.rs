//! Validation helpers for configuration values.

use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Parse and validate an API base URL.
///
/// The URL must be absolute, use `http` or `https`, name a host, and carry no
/// query or fragment. A base path is allowed; resource paths are appended
/// beneath it.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidApiUrl`] describing the first violated rule.
pub fn parse_api_url(value: &str) -> ConfigResult<Url> {
    let trimmed = value.trim();
    let invalid = |reason: &str| ConfigError::InvalidApiUrl {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("must not be empty"));
    }

    let url = Url::parse(trimmed).map_err(|err| invalid(&err.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("a host is required"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query strings and fragments are not allowed"));
    }

    Ok(url)
}
