//! `lc delete` — remove a project.
//!
//! Client roll-ups only move on the add path; deleting a project leaves
//! the owning client's counters as they were.

use crate::output::{CliError, OutputMode, render_error, render_success};
use clap::Args;
use lance_core::Workspace;
use lance_core::error::ErrorCode;
use uuid::Uuid;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Id of the project to delete.
    pub id: Uuid,
}

pub fn run_delete(args: &DeleteArgs, ws: &mut Workspace, output: OutputMode) -> anyhow::Result<()> {
    if ws.projects_mut().delete(args.id) {
        render_success(output, &format!("Deleted project {}", args.id))?;
        Ok(())
    } else {
        render_error(
            output,
            &CliError::with_code(
                format!("project {} not found", args.id),
                ErrorCode::ProjectNotFound,
            ),
        )?;
        anyhow::bail!("project {} not found", args.id);
    }
}
