//! `lc stats` — overview statistics derived from the current snapshot.

use crate::output::{OutputMode, render_item};
use clap::Args;
use lance_core::clock::SystemClock;
use lance_core::Workspace;

#[derive(Args, Debug)]
pub struct StatsArgs {}

pub fn run_stats(_args: &StatsArgs, ws: &Workspace, output: OutputMode) -> anyhow::Result<()> {
    let summary = ws.summary(&SystemClock);
    render_item(&summary, output)?;
    Ok(())
}
