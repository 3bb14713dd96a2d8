use std::io::Write;

use devdb_api_models::ServerConfigUpdate;
use devdb_config::{parse_api_url, store_api_url};
use serde::Serialize;

use crate::cli::{OutputFormat, SetApiUrlArgs, UpdateServerArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::required_flags;
use crate::output::{render_json, render_line};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiUrlReport<'a> {
    api_url: &'a str,
    source: String,
}

pub(crate) fn handle_config_show(ctx: &AppContext, out: &mut dyn Write) -> CliResult<()> {
    let report = ApiUrlReport {
        api_url: ctx.api_url.url.as_str(),
        source: ctx.api_url.source.to_string(),
    };
    match ctx.output {
        OutputFormat::Json => render_json(out, &report),
        OutputFormat::Table => {
            render_line(out, &format!("API URL: {}", report.api_url))?;
            render_line(out, &format!("Source: {}", report.source))
        }
    }
}

pub(crate) fn handle_config_set_api_url(
    ctx: &AppContext,
    args: &SetApiUrlArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let url = parse_api_url(&args.url).map_err(|err| CliError::usage(err.to_string()))?;
    let path = ctx.config_path.as_deref().ok_or_else(|| {
        CliError::usage("no home directory found for the config file; pass --config")
    })?;
    store_api_url(path, &url).map_err(CliError::failure)?;
    render_line(out, &format!("API URL saved to {}", path.display()))
}

pub(crate) async fn handle_config_update_server(
    ctx: &AppContext,
    args: UpdateServerArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [image, db, user, password, backup_url] = required_flags([
        ("postgres-image", args.postgres_image.as_deref()),
        ("postgres-db", args.postgres_db.as_deref()),
        ("postgres-user", args.postgres_user.as_deref()),
        ("postgres-password", args.postgres_password.as_deref()),
        ("backup-location-url", args.backup_location_url.as_deref()),
    ])?;
    let settings = ServerConfigUpdate {
        postgres_image: image.to_string(),
        postgres_db: db.to_string(),
        postgres_user: user.to_string(),
        postgres_password: password.to_string(),
        backup_location_url: backup_url.to_string(),
    };

    ctx.client.update_server_config(&settings).await?;
    render_line(out, "Configuration updated successfully")
}
