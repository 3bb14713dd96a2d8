use std::io::Write;

use devdb_api_models::DatabaseType;

use crate::cli::{ProjectCreateArgs, ProjectIdArgs, ProjectListArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::{owner_or_current_user, path_values, required_flags};
use crate::output::{render_line, render_project_created, render_project_detail, render_project_list};

pub(crate) async fn handle_project_create(
    ctx: &AppContext,
    args: ProjectCreateArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [db_type, version] = required_flags([
        ("type", args.db_type.as_deref()),
        ("version", args.version.as_deref()),
    ])?;
    let db_type: DatabaseType = db_type.parse().map_err(CliError::usage)?;
    let owner = owner_or_current_user(args.owner.as_deref(), ctx).ok_or_else(|| {
        CliError::usage("could not determine the current user; pass --owner")
    })?;

    let project = ctx
        .client
        .create_project(&owner, &args.name, db_type, version)
        .await?;
    render_project_created(out, &project, ctx.output)
}

pub(crate) async fn handle_project_list(
    ctx: &AppContext,
    args: ProjectListArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let owner = if args.all {
        None
    } else {
        Some(owner_or_current_user(args.owner.as_deref(), ctx).ok_or_else(|| {
            CliError::usage("could not determine the current user; pass --owner or --all")
        })?)
    };

    let projects = ctx.client.list_projects(owner.as_deref()).await?;
    render_project_list(out, &projects, ctx.output)
}

pub(crate) async fn handle_project_show(
    ctx: &AppContext,
    args: ProjectIdArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [id] = path_values([("project ID", args.id.as_str())])?;
    let project = ctx.client.show_project(id).await?;
    render_project_detail(out, &project, ctx.output)
}

pub(crate) async fn handle_project_delete(
    ctx: &AppContext,
    args: ProjectIdArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [id] = path_values([("project ID", args.id.as_str())])?;
    ctx.client.delete_project(id).await?;
    render_line(out, &format!("Project {} deleted successfully", args.id))
}
