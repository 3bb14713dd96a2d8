use std::io::Write;

use crate::cli::{DbListArgs, DbTargetArgs};
use crate::client::{AppContext, CliResult};
use crate::commands::{path_values, required_flags};
use crate::output::{
    render_database_created, render_database_detail, render_database_list, render_line,
};

pub(crate) async fn handle_db_create(
    ctx: &AppContext,
    args: DbTargetArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [project] = required_flags([("project", args.project.as_deref())])?;
    let [project, name] = path_values([
        ("project ID", project),
        ("database name", args.name.as_str()),
    ])?;
    let database = ctx.client.create_database(project, name).await?;
    render_database_created(out, &database, ctx.output)
}

pub(crate) async fn handle_db_list(
    ctx: &AppContext,
    args: DbListArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [project] = required_flags([("project", args.project.as_deref())])?;
    let [project] = path_values([("project ID", project)])?;
    let databases = ctx.client.list_databases(project).await?;
    render_database_list(out, &databases, ctx.output)
}

pub(crate) async fn handle_db_show(
    ctx: &AppContext,
    args: DbTargetArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [project] = required_flags([("project", args.project.as_deref())])?;
    let [project, name] = path_values([
        ("project ID", project),
        ("database name", args.name.as_str()),
    ])?;
    let database = ctx.client.show_database(project, name).await?;
    render_database_detail(out, &database, ctx.output)
}

pub(crate) async fn handle_db_delete(
    ctx: &AppContext,
    args: DbTargetArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [project] = required_flags([("project", args.project.as_deref())])?;
    let [project, name] = path_values([
        ("project ID", project),
        ("database name", args.name.as_str()),
    ])?;
    ctx.client.delete_database(project, name).await?;
    render_line(out, &format!("Database {} deleted successfully", args.name))
}
