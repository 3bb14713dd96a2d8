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
#![allow(clippy::redundant_pub_crate)]

//! Command-line client for the DevDB provisioning API.
//!
//! Layout:
//! - `cli.rs`: argument parsing, host context, and command dispatch
//! - `commands/`: command handlers grouped by resource
//! - `client.rs`: resource client, errors, and the handler context
//! - `output.rs`: renderers and formatting helpers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;

pub use cli::{API_URL_ENV, HostContext, execute, run};
