//! Command handlers grouped by resource.

pub(crate) mod config;
pub(crate) mod db;
pub(crate) mod project;

use crate::client::{AppContext, CliError, CliResult, is_path_segment};

/// Check that every named flag carries a non-blank value.
///
/// All missing flags are reported together, in declaration order, before any
/// request is made. Returns the trimmed values in the same order.
pub(crate) fn required_flags<'a, const N: usize>(
    flags: [(&str, Option<&'a str>); N],
) -> CliResult<[&'a str; N]> {
    let missing: Vec<String> = flags
        .iter()
        .filter(|(_, value)| value.map(str::trim).is_none_or(str::is_empty))
        .map(|(name, _)| format!("\"{name}\""))
        .collect();
    if !missing.is_empty() {
        return Err(CliError::usage(format!(
            "required flag(s) {} not set",
            missing.join(", ")
        )));
    }
    Ok(flags.map(|(_, value)| value.map(str::trim).unwrap_or_default()))
}

/// Check identifiers that end up as URL path segments.
///
/// Blank values and `.`/`..` would address a different resource, so they are
/// usage errors raised before any request is made.
pub(crate) fn path_values<'a, const N: usize>(
    values: [(&str, &'a str); N],
) -> CliResult<[&'a str; N]> {
    for (label, value) in &values {
        if value.trim().is_empty() {
            return Err(CliError::usage(format!("{label} must not be empty")));
        }
        if !is_path_segment(value) {
            return Err(CliError::usage(format!("invalid {label} {value:?}")));
        }
    }
    Ok(values.map(|(_, value)| value))
}

/// Explicit `--owner`, falling back to the account running the CLI.
pub(crate) fn owner_or_current_user(explicit: Option<&str>, ctx: &AppContext) -> Option<String> {
    explicit
        .map(str::trim)
        .filter(|owner| !owner.is_empty())
        .or_else(|| ctx.current_user.as_deref())
        .map(str::to_string)
}
