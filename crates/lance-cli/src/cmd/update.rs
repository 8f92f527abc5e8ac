//! `lc update` — merge field changes into an existing project.

use crate::output::{CliError, OutputMode, render_error, render_item};
use clap::Args;
use lance_core::Workspace;
use lance_core::error::ErrorCode;
use lance_core::model::ProjectPatch;
use uuid::Uuid;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Id of the project to update.
    pub id: Uuid,

    /// New project name.
    #[arg(long)]
    pub name: Option<String>,

    /// New client name. Does not re-run aggregation.
    #[arg(long)]
    pub client: Option<String>,

    /// New budget in dollars.
    #[arg(long)]
    pub budget: Option<f64>,

    /// New deadline as YYYY-MM-DD.
    #[arg(long)]
    pub deadline: Option<String>,

    /// New progress percent.
    #[arg(long)]
    pub progress: Option<f64>,
}

pub fn run_update(args: UpdateArgs, ws: &mut Workspace, output: OutputMode) -> anyhow::Result<()> {
    if ws.projects().find(args.id).is_none() {
        render_error(
            output,
            &CliError::with_code(
                format!("project {} not found", args.id),
                ErrorCode::ProjectNotFound,
            ),
        )?;
        anyhow::bail!("project {} not found", args.id);
    }

    ws.projects_mut().update(
        args.id,
        &ProjectPatch {
            name: args.name,
            client: args.client,
            budget: args.budget,
            deadline: args.deadline,
            progress: args.progress,
        },
    );

    if let Some(updated) = ws.projects().find(args.id) {
        let updated = updated.clone();
        render_item(&updated, output)?;
    }
    Ok(())
}
