use std::fs;

use anyhow::Result;
use devdb_config::{ApiUrlSource, parse_api_url, resolve_api_url, store_api_url};
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> Result<std::path::PathBuf> {
    let path = dir.path().join(".devdb.yaml");
    fs::write(&path, contents)?;
    Ok(path)
}

#[test]
fn flag_wins_over_config_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "api:\n  url: http://from-file:9000\n")?;

    let resolved = resolve_api_url(Some("http://from-flag:7000"), Some(&path))?;

    assert_eq!(resolved.source, ApiUrlSource::Flag);
    assert_eq!(resolved.url.as_str(), "http://from-flag:7000/");
    Ok(())
}

#[test]
fn config_file_wins_over_default() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "api:\n  url: https://gw.example/devdb\n")?;

    let resolved = resolve_api_url(None, Some(&path))?;

    assert_eq!(resolved.source, ApiUrlSource::ConfigFile(path));
    assert_eq!(resolved.url.as_str(), "https://gw.example/devdb");
    Ok(())
}

#[test]
fn default_applies_when_nothing_is_configured() -> Result<()> {
    let dir = TempDir::new()?;
    let missing = dir.path().join("absent.yaml");

    let resolved = resolve_api_url(None, Some(&missing))?;

    assert_eq!(resolved.source, ApiUrlSource::Default);
    assert_eq!(resolved.url.as_str(), "http://localhost:5000/");
    Ok(())
}

#[test]
fn malformed_config_file_falls_through_to_default() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "api: [not, a, mapping\n")?;

    let resolved = resolve_api_url(None, Some(&path))?;

    assert_eq!(resolved.source, ApiUrlSource::Default);
    Ok(())
}

#[test]
fn invalid_stored_url_falls_through_to_default() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "api:\n  url: ftp://files.example\n")?;

    let resolved = resolve_api_url(None, Some(&path))?;

    assert_eq!(resolved.source, ApiUrlSource::Default);
    Ok(())
}

#[test]
fn stored_url_is_picked_up_by_the_resolver() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "theme: dark\n")?;

    store_api_url(&path, &parse_api_url("http://10.0.0.5:5000")?)?;
    let resolved = resolve_api_url(None, Some(&path))?;

    assert_eq!(resolved.source, ApiUrlSource::ConfigFile(path.clone()));
    assert_eq!(resolved.url.as_str(), "http://10.0.0.5:5000/");
    assert!(fs::read_to_string(&path)?.contains("theme: dark"));
    Ok(())
}
