//! Output renderers and formatting helpers for CLI commands.

use std::io::{self, Write};

use anyhow::anyhow;
use devdb_api_models::{Database, Project};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

pub(crate) fn render_project_created(
    out: &mut dyn Write,
    project: &Project,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => render_json(out, &redacted(project)),
        OutputFormat::Table => write_project_created(out, project).map_err(output_failure),
    }
}

pub(crate) fn render_project_list(
    out: &mut dyn Write,
    projects: &[Project],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let projects: Vec<Project> = projects.iter().map(redacted).collect();
            render_json(out, &projects)
        }
        OutputFormat::Table => write_project_list(out, projects).map_err(output_failure),
    }
}

pub(crate) fn render_project_detail(
    out: &mut dyn Write,
    project: &Project,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => render_json(out, &redacted(project)),
        OutputFormat::Table => write_project_detail(out, project).map_err(output_failure),
    }
}

pub(crate) fn render_database_created(
    out: &mut dyn Write,
    database: &Database,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => render_json(out, database),
        OutputFormat::Table => write_database_created(out, database).map_err(output_failure),
    }
}

pub(crate) fn render_database_list(
    out: &mut dyn Write,
    databases: &[Database],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => render_json(out, databases),
        OutputFormat::Table => write_database_list(out, databases).map_err(output_failure),
    }
}

pub(crate) fn render_database_detail(
    out: &mut dyn Write,
    database: &Database,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => render_json(out, database),
        OutputFormat::Table => write_database_detail(out, database).map_err(output_failure),
    }
}

/// Print a single confirmation line; identical in every output format.
pub(crate) fn render_line(out: &mut dyn Write, line: &str) -> CliResult<()> {
    writeln!(out, "{line}").map_err(output_failure)
}

pub(crate) fn render_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    writeln!(out, "{text}").map_err(output_failure)
}

/// Copy of `project` without the generated password; no report prints it.
fn redacted(project: &Project) -> Project {
    let mut project = project.clone();
    if let Some(credentials) = project.default_credentials.as_mut() {
        credentials.password = None;
    }
    project
}

fn output_failure(err: io::Error) -> CliError {
    CliError::failure(anyhow!("failed to write output: {err}"))
}

fn write_project_created(out: &mut dyn Write, project: &Project) -> io::Result<()> {
    writeln!(out, "Project created successfully")?;
    writeln!(out, "Details:")?;
    writeln!(out, "  ID: {}", project.id)?;
    writeln!(out, "  Name: {}", project.name)?;
    writeln!(out, "  Owner: {}", project.owner)?;
    writeln!(out, "  DbType: {}", project.db_type)?;
    writeln!(out, "  DbVersion: {}", project.db_version)
}

fn write_project_list(out: &mut dyn Write, projects: &[Project]) -> io::Result<()> {
    if projects.is_empty() {
        return writeln!(out, "No projects found");
    }
    writeln!(out, "Projects:")?;
    for project in projects {
        writeln!(out, "- {} (ID: {})", project.name, project.id)?;
        writeln!(out, "  Owner: {}", project.owner)?;
        writeln!(out, "  DbType: {}", project.db_type)?;
        writeln!(out, "  DbVersion: {}", project.db_version)?;
    }
    Ok(())
}

fn write_project_detail(out: &mut dyn Write, project: &Project) -> io::Result<()> {
    writeln!(out, "Project Details:")?;
    writeln!(out, "ID: {}", project.id)?;
    writeln!(out, "Name: {}", project.name)?;
    writeln!(out, "Owner: {}", project.owner)?;
    writeln!(out, "DbType: {}", project.db_type)?;
    writeln!(out, "DbVersion: {}", project.db_version)?;
    if let Some(location) = non_empty(project.backup_location.as_deref()) {
        writeln!(out, "BackupLocation: {location}")?;
    }

    let databases = project.databases.as_deref().unwrap_or_default();
    if !databases.is_empty() {
        writeln!(out)?;
        writeln!(out, "Databases:")?;
        for database in databases {
            write_database_entry(out, database)?;
        }
    }
    Ok(())
}

fn write_database_created(out: &mut dyn Write, database: &Database) -> io::Result<()> {
    writeln!(out, "Database created successfully")?;
    writeln!(out, "Details:")?;
    writeln!(out, "  Name: {}", database.name)?;
    writeln!(out, "  Status: {}", database.status)?;
    write_connection_lines(out, database, "  ")
}

fn write_database_list(out: &mut dyn Write, databases: &[Database]) -> io::Result<()> {
    if databases.is_empty() {
        return writeln!(out, "No databases found");
    }
    writeln!(out, "Databases:")?;
    for database in databases {
        write_database_entry(out, database)?;
    }
    Ok(())
}

fn write_database_detail(out: &mut dyn Write, database: &Database) -> io::Result<()> {
    writeln!(out, "Database Details:")?;
    writeln!(out, "Name: {}", database.name)?;
    writeln!(out, "Status: {}", database.status)?;
    write_connection_lines(out, database, "")
}

fn write_database_entry(out: &mut dyn Write, database: &Database) -> io::Result<()> {
    writeln!(out, "- {} (Status: {})", database.name, database.status)?;
    write_connection_lines(out, database, "  ")
}

/// Optional connection fields; absent, empty, and zero-port values are skipped.
fn write_connection_lines(out: &mut dyn Write, database: &Database, indent: &str) -> io::Result<()> {
    if let Some(host) = non_empty(database.host.as_deref()) {
        writeln!(out, "{indent}Host: {host}")?;
    }
    if let Some(port) = database.port.filter(|port| *port != 0) {
        writeln!(out, "{indent}Port: {port}")?;
    }
    if let Some(username) = non_empty(database.username.as_deref()) {
        writeln!(out, "{indent}Username: {username}")?;
    }
    if let Some(name) = non_empty(database.database.as_deref()) {
        writeln!(out, "{indent}Database: {name}")?;
    }
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use devdb_api_models::{DatabaseType, DefaultCredentials};

    fn database(name: &str) -> Database {
        Database {
            name: name.to_string(),
            status: "running".into(),
            host: Some("10.0.0.12".into()),
            port: Some(5432),
            username: Some("postgres".into()),
            database: Some(name.to_string()),
        }
    }

    fn project() -> Project {
        Project {
            id: "p-1".into(),
            name: "analytics".into(),
            owner: "alice".into(),
            db_type: DatabaseType::Mysql,
            db_version: "8.0".into(),
            backup_location: Some(String::new()),
            default_credentials: None,
            databases: None,
        }
    }

    fn rendered(render: impl FnOnce(&mut dyn Write) -> CliResult<()>) -> String {
        let mut buffer: Vec<u8> = Vec::new();
        render(&mut buffer).expect("render should succeed");
        String::from_utf8(buffer).expect("utf-8 output")
    }

    #[test]
    fn project_detail_omits_empty_backup_and_databases() {
        let text = rendered(|out| render_project_detail(out, &project(), OutputFormat::Table));
        assert_eq!(
            text,
            "Project Details:\nID: p-1\nName: analytics\nOwner: alice\nDbType: mysql\nDbVersion: 8.0\n"
        );
    }

    #[test]
    fn project_detail_lists_databases_after_blank_line() {
        let mut detail = project();
        detail.backup_location = Some("s3://b/k".into());
        detail.databases = Some(vec![database("main")]);
        let text = rendered(|out| render_project_detail(out, &detail, OutputFormat::Table));
        assert!(text.contains("BackupLocation: s3://b/k\n\nDatabases:\n- main (Status: running)\n"));
        assert!(text.ends_with("  Host: 10.0.0.12\n  Port: 5432\n  Username: postgres\n  Database: main\n"));
    }

    #[test]
    fn database_detail_is_unindented() {
        let mut db = database("main");
        db.port = Some(0);
        db.username = None;
        let text = rendered(|out| render_database_detail(out, &db, OutputFormat::Table));
        assert_eq!(
            text,
            "Database Details:\nName: main\nStatus: running\nHost: 10.0.0.12\nDatabase: main\n"
        );
    }

    #[test]
    fn empty_lists_render_placeholders() {
        let text = rendered(|out| render_project_list(out, &[], OutputFormat::Table));
        assert_eq!(text, "No projects found\n");
        let text = rendered(|out| render_database_list(out, &[], OutputFormat::Table));
        assert_eq!(text, "No databases found\n");
    }

    #[test]
    fn json_project_reports_leave_out_the_password() {
        let mut created = project();
        created.default_credentials = Some(DefaultCredentials {
            username: "postgres".into(),
            password: Some("s3cret".into()),
            database: "analytics".into(),
        });

        let text = rendered(|out| render_project_created(out, &created, OutputFormat::Json));
        assert!(!text.contains("s3cret"));
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(value["defaultCredentials"]["username"], "postgres");
        assert!(value["defaultCredentials"].get("password").is_none());

        let text = rendered(|out| render_project_list(out, &[created.clone()], OutputFormat::Json));
        assert!(!text.contains("s3cret"));
        let text = rendered(|out| render_project_detail(out, &created, OutputFormat::Json));
        assert!(!text.contains("s3cret"));
        assert_eq!(created.default_credentials.and_then(|c| c.password).as_deref(), Some("s3cret"));
    }

    #[test]
    fn json_format_prints_decoded_value() {
        let text = rendered(|out| render_database_list(out, &[database("main")], OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(value[0]["name"], "main");
        assert_eq!(value[0]["port"], 5432);
    }
}
