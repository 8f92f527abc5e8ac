//! `lc clients` — list client roll-ups.

use crate::output::{OutputMode, render_list};
use clap::Args;
use lance_core::Workspace;

#[derive(Args, Debug)]
pub struct ClientsArgs {
    /// Only show clients with active status.
    #[arg(long)]
    pub active: bool,
}

pub fn run_clients(args: &ClientsArgs, ws: &Workspace, output: OutputMode) -> anyhow::Result<()> {
    let clients: Vec<_> = ws
        .clients()
        .list()
        .iter()
        .filter(|c| !args.active || c.status.is_active())
        .cloned()
        .collect();

    render_list(&clients, output)?;
    Ok(())
}
