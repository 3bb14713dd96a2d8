#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Configuration for the DevDB CLI: where the API lives and how that choice is
//! persisted.
//!
//! Layout: `defaults.rs` (built-in fallbacks), `validate.rs` (URL parsing
//! rules), `file.rs` (the `~/.devdb.yaml` store), `resolve.rs` (flag > file >
//! default precedence).

pub mod defaults;
pub mod error;
pub mod file;
pub mod resolve;
pub mod validate;

pub use defaults::{CONFIG_FILE_NAME, DEFAULT_API_URL};
pub use error::{ConfigError, ConfigResult};
pub use file::{ApiSection, ConfigFile, default_config_path, load_config_file, store_api_url};
pub use resolve::{ApiUrlSource, ResolvedApiUrl, resolve_api_url};
pub use validate::parse_api_url;
