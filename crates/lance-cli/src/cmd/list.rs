//! `lc list` — list projects with optional search and status filters.

use crate::output::{OutputMode, render_list};
use clap::Args;
use lance_core::Workspace;
use lance_core::model::ProjectStatus;
use lance_core::workspace::filter_projects;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Substring to match against project or client names.
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by derived status: planning, in-progress, or completed.
    #[arg(long)]
    pub status: Option<ProjectStatus>,
}

pub fn run_list(args: &ListArgs, ws: &Workspace, output: OutputMode) -> anyhow::Result<()> {
    let filtered: Vec<_> = filter_projects(
        ws.projects().list(),
        args.search.as_deref().unwrap_or(""),
        args.status,
    )
    .into_iter()
    .cloned()
    .collect();

    render_list(&filtered, output)?;
    Ok(())
}
