//! Command registry: argument parsing, context construction, and dispatch.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use devdb_config::{default_config_path, resolve_api_url};
use devdb_telemetry::{LogFormat, LoggingConfig, init_logging};
use tracing::debug;

use crate::client::{AppContext, CliError, CliResult, ResourceClient};
use crate::commands::config::{
    handle_config_set_api_url, handle_config_show, handle_config_update_server,
};
use crate::commands::db::{handle_db_create, handle_db_delete, handle_db_list, handle_db_show};
use crate::commands::project::{
    handle_project_create, handle_project_delete, handle_project_list, handle_project_show,
};

/// Environment variable consulted when `--api-url` is not given.
pub const API_URL_ENV: &str = "DEVDB_API_URL";

/// Facts about the invoking process captured once at startup.
#[derive(Debug, Clone, Default)]
pub struct HostContext {
    /// Value of `DEVDB_API_URL`; ranks with the `--api-url` flag.
    pub api_url_env: Option<String>,
    /// Account name used as the default project owner.
    pub current_user: Option<String>,
    /// Config file consulted when `--config` is not given.
    pub default_config_path: Option<PathBuf>,
}

impl HostContext {
    /// Capture the current user, the API URL variable, and the home-directory
    /// config path.
    #[must_use]
    pub fn from_env() -> Self {
        let current_user = ["USER", "USERNAME", "LOGNAME"]
            .into_iter()
            .filter_map(|key| std::env::var(key).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty());
        Self {
            api_url_env: std::env::var(API_URL_ENV).ok(),
            current_user,
            default_config_path: default_config_path(),
        }
    }
}

/// Binary entrypoint: initialises logging, runs the process arguments, and
/// returns the exit code.
pub async fn run() -> i32 {
    let format = LogFormat::from_env().unwrap_or(LogFormat::Pretty);
    let logging = LoggingConfig {
        format,
        ..LoggingConfig::default()
    };
    if let Err(err) = init_logging(&logging) {
        debug!(error = %err, "logging already initialised");
    }

    let host = HostContext::from_env();
    let mut stdout = io::stdout().lock();
    let exit_code = execute(std::env::args_os(), &host, &mut stdout).await;
    let _ = stdout.flush();
    exit_code
}

/// Parse `args`, run the selected command, and write its report to `out`.
///
/// Failures are rendered as a single `Error: <message>` line; the return value
/// is the process exit code (0 success, 2 usage, 3 remote or transport).
pub async fn execute<I, T>(args: I, host: &HostContext, out: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => return report_parse_error(&err, out),
    };

    match dispatch(cli, host, out).await {
        Ok(()) => 0,
        Err(err) => {
            if let CliError::Api(api) = &err {
                debug!(kind = ?api.kind(), "request failed");
            }
            let exit_code = err.exit_code();
            // Nothing useful remains to be done if the sink itself is broken.
            let _ = writeln!(out, "Error: {}", err.display_message());
            exit_code
        }
    }
}

fn report_parse_error(err: &clap::Error, out: &mut dyn Write) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(out, "{}", err.render());
            0
        }
        ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let _ = write!(out, "{}", err.render());
            2
        }
        _ => {
            let usage = CliError::usage(fold_clap_message(&err.render().to_string()));
            let _ = writeln!(out, "Error: {}", usage.display_message());
            usage.exit_code()
        }
    }
}

/// Reduce clap's multi-line rendering to its first paragraph on one line.
fn fold_clap_message(rendered: &str) -> String {
    let headline = rendered.split("\n\n").next().unwrap_or_default();
    let headline = headline.trim().strip_prefix("error:").unwrap_or(headline);
    headline
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

async fn dispatch(cli: Cli, host: &HostContext, out: &mut dyn Write) -> CliResult<()> {
    let config_path = cli.config.or_else(|| host.default_config_path.clone());
    let flag = cli
        .api_url
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .or(host.api_url_env.as_deref());
    let api_url = resolve_api_url(flag, config_path.as_deref())
        .map_err(|err| CliError::usage(err.to_string()))?;
    debug!(url = %api_url.url, source = %api_url.source, "resolved API URL");

    let ctx = AppContext {
        client: ResourceClient::new(api_url.url.clone(), cli.timeout.map(Duration::from_secs))?,
        output: cli.output,
        current_user: host.current_user.clone(),
        api_url,
        config_path,
    };

    match cli.command {
        Command::Project(project) => match project {
            ProjectCommand::Create(args) => handle_project_create(&ctx, args, out).await,
            ProjectCommand::List(args) => handle_project_list(&ctx, args, out).await,
            ProjectCommand::Show(args) => handle_project_show(&ctx, args, out).await,
            ProjectCommand::Delete(args) => handle_project_delete(&ctx, args, out).await,
        },
        Command::Db(db) => match db {
            DbCommand::Create(args) => handle_db_create(&ctx, args, out).await,
            DbCommand::List(args) => handle_db_list(&ctx, args, out).await,
            DbCommand::Show(args) => handle_db_show(&ctx, args, out).await,
            DbCommand::Delete(args) => handle_db_delete(&ctx, args, out).await,
        },
        Command::Config(config) => match config {
            ConfigCommand::Show => handle_config_show(&ctx, out),
            ConfigCommand::SetApiUrl(args) => handle_config_set_api_url(&ctx, &args, out),
            ConfigCommand::UpdateServer(args) => {
                handle_config_update_server(&ctx, args, out).await
            }
        },
    }
}

#[derive(Parser)]
#[command(
    name = "devdb",
    version,
    about = "DevDB - Development Database Manager",
    long_about = "Create, inspect, and delete development databases grouped into projects, \
                  without touching the infrastructure that runs them."
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "DevDB API URL (overrides DEVDB_API_URL and the config file)"
    )]
    api_url: Option<String>,
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Config file (default is $HOME/.devdb.yaml)"
    )]
    config: Option<PathBuf>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[arg(
        long,
        global = true,
        value_name = "SECS",
        help = "Per-request timeout in seconds (no limit when omitted)"
    )]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Manage databases inside a project
    #[command(subcommand)]
    Db(DbCommand),
    /// Inspect or change CLI and server configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Create a new project
    Create(ProjectCreateArgs),
    /// List projects
    List(ProjectListArgs),
    /// Show a project and its databases
    Show(ProjectIdArgs),
    /// Delete a project
    Delete(ProjectIdArgs),
}

#[derive(Subcommand)]
enum DbCommand {
    /// Create a database in a project
    Create(DbTargetArgs),
    /// List databases in a project
    List(DbListArgs),
    /// Show a database
    Show(DbTargetArgs),
    /// Delete a database
    Delete(DbTargetArgs),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the API URL in effect and where it came from
    Show,
    /// Persist the API URL to the config file
    SetApiUrl(SetApiUrlArgs),
    /// Update the server's provisioning defaults
    UpdateServer(UpdateServerArgs),
}

#[derive(Args, Debug)]
pub(crate) struct ProjectCreateArgs {
    #[arg(help = "Project name")]
    pub(crate) name: String,
    #[arg(long, help = "Owner of the project (defaults to current user)")]
    pub(crate) owner: Option<String>,
    #[arg(long = "type", short = 't', help = "Type of database (postgres or mysql)")]
    pub(crate) db_type: Option<String>,
    #[arg(long, short = 'v', help = "Version of the database")]
    pub(crate) version: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ProjectListArgs {
    #[arg(long, help = "Only list projects of this owner (defaults to current user)")]
    pub(crate) owner: Option<String>,
    #[arg(long, conflicts_with = "owner", help = "List projects of every owner")]
    pub(crate) all: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ProjectIdArgs {
    #[arg(help = "Project identifier")]
    pub(crate) id: String,
}

#[derive(Args, Debug)]
pub(crate) struct DbTargetArgs {
    #[arg(help = "Database name")]
    pub(crate) name: String,
    #[arg(long, help = "Identifier of the owning project")]
    pub(crate) project: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct DbListArgs {
    #[arg(long, help = "Identifier of the owning project")]
    pub(crate) project: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct SetApiUrlArgs {
    #[arg(help = "Absolute http(s) URL of the DevDB API")]
    pub(crate) url: String,
}

#[derive(Args, Debug)]
pub(crate) struct UpdateServerArgs {
    #[arg(long, help = "Postgres image to use")]
    pub(crate) postgres_image: Option<String>,
    #[arg(long, help = "Database name")]
    pub(crate) postgres_db: Option<String>,
    #[arg(long, help = "Database user")]
    pub(crate) postgres_user: Option<String>,
    #[arg(long, help = "Database password")]
    pub(crate) postgres_password: Option<String>,
    #[arg(long, help = "Backup location URL")]
    pub(crate) backup_location_url: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}
