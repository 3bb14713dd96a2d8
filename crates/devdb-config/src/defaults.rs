//! Built-in fallbacks for the CLI configuration.
//!
//! # Design
//! - The default origin targets a backend running on the operator's machine.
//! - The config file lives directly in the home directory, dot-prefixed.

/// Origin used when neither the flag nor the config file provides one.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
/// File name of the per-user config file inside the home directory.
pub const CONFIG_FILE_NAME: &str = ".devdb.yaml";
