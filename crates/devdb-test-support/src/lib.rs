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

//! Shared test helpers used across integration suites.
//! Layout: fixtures.rs (canned API response bodies), sandbox.rs (throwaway
//! config files).

pub mod fixtures;
pub mod sandbox;

pub use sandbox::ConfigSandbox;
