//! `lc timer` — the restart-safe session timer.
//!
//! `start` and `pause` are state transitions; `status` recomputes the
//! live elapsed value from the persisted snapshot, so it is correct even
//! if no watch loop ever ran. `watch` drives the cooperative tick:
//! sleep, checkpoint, redraw, until the timer stops or the process is
//! interrupted.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use clap::Subcommand;
use lance_core::Workspace;
use lance_core::clock::SystemClock;
use lance_core::timer::format_hms;

use crate::output::{OutputMode, TimerStatus, render_item, render_success};

#[derive(Subcommand, Debug)]
pub enum TimerCommand {
    /// Start the session timer. No-op while already running.
    Start,
    /// Pause the session timer. No-op while already stopped.
    Pause,
    /// Show the current elapsed time.
    Status,
    /// Redraw and checkpoint every tick while the timer runs.
    Watch {
        /// Stop after this many ticks instead of running until interrupted.
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
    },
}

pub fn run_timer(
    command: &TimerCommand,
    ws: &mut Workspace,
    output: OutputMode,
    tick_secs: u64,
) -> anyhow::Result<()> {
    let clock = SystemClock;
    match command {
        TimerCommand::Start => {
            let already_running = ws.timer().is_running();
            ws.timer_mut().start(&clock);
            let message = if already_running {
                "Timer already running".to_string()
            } else {
                format!("Timer started at {}", format_hms(ws.timer().elapsed_ms(&clock)))
            };
            render_success(output, &message)?;
        }
        TimerCommand::Pause => {
            let was_running = ws.timer().is_running();
            ws.timer_mut().pause(&clock);
            let message = if was_running {
                format!("Paused at {}", format_hms(ws.timer().elapsed_ms(&clock)))
            } else {
                "Timer already stopped".to_string()
            };
            render_success(output, &message)?;
        }
        TimerCommand::Status => {
            let status = TimerStatus::new(ws.timer().is_running(), ws.timer().elapsed_ms(&clock));
            render_item(&status, output)?;
        }
        TimerCommand::Watch { ticks } => run_watch(ws, output, tick_secs, *ticks)?,
    }
    Ok(())
}

fn run_watch(
    ws: &mut Workspace,
    output: OutputMode,
    tick_secs: u64,
    ticks: Option<u64>,
) -> anyhow::Result<()> {
    if !ws.timer().is_running() {
        render_success(output, "Timer is not running; nothing to watch")?;
        return Ok(());
    }

    let clock = SystemClock;
    let period = Duration::from_secs(tick_secs.max(1));
    let mut remaining = ticks;

    loop {
        if remaining == Some(0) {
            break;
        }
        thread::sleep(period);

        let live = ws.timer_mut().tick(&clock);
        if output.is_json() {
            println!("{}", serde_json::json!({ "elapsedMs": live }));
        } else {
            print!("\r{}", format_hms(live));
            io::stdout().flush()?;
        }

        if let Some(n) = remaining.as_mut() {
            *n -= 1;
        }
        if !ws.timer().is_running() {
            break;
        }
    }

    if !output.is_json() {
        println!();
    }
    Ok(())
}
