//! `lc add` — add a project and credit its client in one step.

use crate::output::{OutputMode, render_item};
use clap::Args;
use lance_core::Workspace;
use lance_core::model::ProjectDraft;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Project name.
    #[arg(short, long)]
    pub name: String,

    /// Client the work is for (free text, matched case-insensitively).
    #[arg(short, long)]
    pub client: String,

    /// Budget in dollars. Non-numeric input is stored as 0.
    #[arg(short, long)]
    pub budget: Option<String>,

    /// Deadline as YYYY-MM-DD. Defaults to TBD.
    #[arg(short, long)]
    pub deadline: Option<String>,

    /// Progress percent. Non-numeric input is stored as 0.
    #[arg(short, long)]
    pub progress: Option<String>,
}

pub fn run_add(args: AddArgs, ws: &mut Workspace, output: OutputMode) -> anyhow::Result<()> {
    let project = ws.add_project_with_client(ProjectDraft {
        id: None,
        name: args.name,
        client: args.client,
        budget: args.budget,
        deadline: args.deadline,
        progress: args.progress,
    });

    render_item(&project, output)?;
    Ok(())
}
