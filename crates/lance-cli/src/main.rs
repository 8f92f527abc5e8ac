#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use lance_core::Workspace;
use lance_core::config;
use output::{CliError, render_error};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "lance: local-first freelance work tracker",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Override the data directory (also honored via LANCE_DATA).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Projects",
        about = "Add a project and credit its client",
        long_about = "Add a project and update the owning client's roll-up in one step. \
                      An unknown client is created on the fly.",
        after_help = "EXAMPLES:\n    # Add work for a new or existing client\n    lc add --name \"Landing Page Redesign\" --client \"Acme Co.\" --budget 3000\n\n    # Emit machine-readable output\n    lc add --name \"Logo\" --client Nova --json"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Projects",
        about = "List projects",
        long_about = "List projects with optional search and derived-status filters.",
        after_help = "EXAMPLES:\n    # All projects, newest first\n    lc list\n\n    # Filter by text and status\n    lc list --search acme --status in-progress\n\n    # Emit machine-readable output\n    lc list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Projects",
        about = "Update fields of a project",
        long_about = "Merge the given fields into an existing project by id.",
        after_help = "EXAMPLES:\n    # Bump progress\n    lc update 7c9e6679-7425-40de-944b-e07fc1f90ae7 --progress 75\n\n    # Emit machine-readable output\n    lc update 7c9e6679-7425-40de-944b-e07fc1f90ae7 --budget 4500 --json"
    )]
    Update(cmd::update::UpdateArgs),

    #[command(
        next_help_heading = "Projects",
        about = "Delete a project",
        after_help = "EXAMPLES:\n    # Remove a project by id\n    lc delete 7c9e6679-7425-40de-944b-e07fc1f90ae7"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Clients",
        about = "List client roll-ups",
        after_help = "EXAMPLES:\n    # All clients\n    lc clients\n\n    # Only active ones\n    lc clients --active"
    )]
    Clients(cmd::clients::ClientsArgs),

    #[command(
        next_help_heading = "Overview",
        about = "Show dashboard statistics",
        after_help = "EXAMPLES:\n    # Totals, active clients, due-soon count, completion rate\n    lc stats --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Overview",
        about = "Track session time",
        after_help = "EXAMPLES:\n    # Start, check, and stop the session timer\n    lc timer start\n    lc timer status\n    lc timer pause\n\n    # Live display that checkpoints every tick\n    lc timer watch"
    )]
    Timer {
        #[command(subcommand)]
        command: cmd::timer::TimerCommand,
    },

    #[command(
        next_help_heading = "Maintenance",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    lc completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env("LANCE_LOG").unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Completions need no config, store, or lock.
    if let Commands::Completions(args) = &cli.command {
        cmd::completions::run_completions(args, &mut Cli::command());
        return Ok(());
    }

    let fallback_mode = output::resolve_output_mode(cli.json, None);
    let config = match config::load_user_config() {
        Ok(config) => config,
        Err(err) => {
            render_error(
                fallback_mode,
                &CliError::with_code(
                    format!("{err:#}"),
                    lance_core::error::ErrorCode::ConfigParseError,
                ),
            )?;
            anyhow::bail!("{err}");
        }
    };
    let mode = output::resolve_output_mode(cli.json, config.output.as_deref());

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config::resolve_data_dir(&config));

    let mut ws = match Workspace::open(&data_dir) {
        Ok(ws) => ws,
        Err(err) => {
            render_error(mode, &CliError::with_code(err.to_string(), err.code()))?;
            anyhow::bail!("{err}");
        }
    };
    tracing::debug!(data_dir = %data_dir.display(), "workspace opened");

    match cli.command {
        Commands::Add(args) => cmd::add::run_add(args, &mut ws, mode),
        Commands::List(args) => cmd::list::run_list(&args, &ws, mode),
        Commands::Update(args) => cmd::update::run_update(args, &mut ws, mode),
        Commands::Delete(args) => cmd::delete::run_delete(&args, &mut ws, mode),
        Commands::Clients(args) => cmd::clients::run_clients(&args, &ws, mode),
        Commands::Stats(args) => cmd::stats::run_stats(&args, &ws, mode),
        Commands::Timer { command } => {
            cmd::timer::run_timer(&command, &mut ws, mode, config.timer.tick_secs)
        }
        Commands::Completions(_) => Ok(()),
    }
}
