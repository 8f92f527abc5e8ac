//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: pretty output for humans, compact text for pipes, or
//! stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `output` in the user config
//! 4. Default: pretty if stdout is a TTY; text if piped.

use lance_core::model::{Client, Project};
use lance_core::timer::format_hms;
use lance_core::workspace::Summary;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-optimized output with labels and framing.
    Pretty,
    /// Token-efficient plain rows for pipes and scripts.
    Text,
    /// Machine-readable JSON (one object per result, or a JSON array).
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    #[must_use]
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    json_flag: bool,
    format_env: Option<&str>,
    config_output: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    fn parse(raw: &str) -> Option<OutputMode> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(OutputMode::Pretty),
            "text" => Some(OutputMode::Text),
            "json" => Some(OutputMode::Json),
            _ => None,
        }
    }

    if json_flag {
        return OutputMode::Json;
    }

    if let Some(mode) = format_env.and_then(parse) {
        return mode;
    }

    if let Some(mode) = config_output.and_then(parse) {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from the CLI flag, environment, user config,
/// and TTY defaults.
#[must_use]
pub fn resolve_output_mode(json_flag: bool, config_output: Option<&str>) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(json_flag, env_val.as_deref(), config_output, is_tty)
}

/// Trait implemented by any CLI result type that can be rendered in all
/// modes. `render_table` rows appear in the same column order as
/// [`Renderable::table_headers`].
pub trait Renderable {
    /// Render for human consumption.
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Render as a self-contained JSON object.
    fn render_json(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Render as a single text row (no header).
    fn render_table(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Column headers for text mode.
    fn table_headers() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }
}

/// Render a single [`Renderable`] item to stdout using the given mode.
pub fn render_item<R: Renderable>(item: &R, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Pretty => item.render_human(&mut out),
        OutputMode::Text => item.render_table(&mut out),
        OutputMode::Json => {
            item.render_json(&mut out)?;
            writeln!(out)
        }
    }
}

/// Render a list of [`Renderable`] items to stdout.
///
/// JSON mode wraps items in a JSON array; text mode prints a header row
/// followed by one row per item.
pub fn render_list<R: Renderable>(items: &[R], mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Pretty => {
            for item in items {
                item.render_human(&mut out)?;
            }
        }
        OutputMode::Text => {
            let headers = R::table_headers();
            if !items.is_empty() && !headers.is_empty() {
                writeln!(out, "{}", headers.join("  "))?;
            }
            for item in items {
                item.render_table(&mut out)?;
            }
        }
        OutputMode::Json => {
            write!(out, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(out, ",")?;
                }
                writeln!(out)?;
                item.render_json(&mut out)?;
            }
            writeln!(out, "\n]")?;
        }
    }
    Ok(())
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "E2002").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create a simple error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }

    /// Create an error carrying a [`lance_core::error::ErrorCode`].
    pub fn with_code(message: impl Into<String>, code: lance_core::error::ErrorCode) -> Self {
        Self {
            message: message.into(),
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Render a success message to stdout.
pub fn render_success(mode: OutputMode, message: &str) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "ok": true, "message": message });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(out, "✓ {message}")?;
        }
    }
    Ok(())
}

impl Renderable for Project {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}", self.name)?;
        writeln!(w, "  id:        {}", self.id)?;
        writeln!(w, "  client:    {}", self.client)?;
        writeln!(w, "  budget:    ${}", self.budget)?;
        writeln!(w, "  deadline:  {}", self.deadline)?;
        writeln!(w, "  progress:  {}% ({})", self.progress, self.status())
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(w, self).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}  {}  {}  {}  {}  {}%  {}",
            self.id,
            self.name,
            self.client,
            self.budget,
            self.deadline,
            self.progress,
            self.status()
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &[
            "ID", "NAME", "CLIENT", "BUDGET", "DEADLINE", "PROGRESS", "STATUS",
        ]
    }
}

impl Renderable for Client {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "[{}] {} ({})", self.avatar, self.name, self.status)?;
        writeln!(
            w,
            "  {} projects · ${} total paid",
            self.projects, self.total_paid
        )
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(w, self).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}  {}  {}  {}  {}",
            self.name, self.avatar, self.projects, self.total_paid, self.status
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["NAME", "AVATAR", "PROJECTS", "TOTAL_PAID", "STATUS"]
    }
}

impl Renderable for Summary {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "total earnings:   ${}", self.total_earnings)?;
        writeln!(w, "active clients:   {}", self.active_clients)?;
        writeln!(w, "due within 7d:    {}", self.due_within_week)?;
        writeln!(w, "completion rate:  {}%", self.completion_rate)
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(w, self).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}  {}  {}  {}",
            self.total_earnings, self.active_clients, self.due_within_week, self.completion_rate
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["EARNINGS", "ACTIVE_CLIENTS", "DUE_7D", "COMPLETION"]
    }
}

/// Timer state as shown by `lc timer status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStatus {
    pub is_running: bool,
    pub elapsed_ms: i64,
    pub formatted: String,
}

impl TimerStatus {
    #[must_use]
    pub fn new(is_running: bool, elapsed_ms: i64) -> Self {
        Self {
            is_running,
            elapsed_ms,
            formatted: format_hms(elapsed_ms),
        }
    }
}

impl Renderable for TimerStatus {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let state = if self.is_running { "running" } else { "stopped" };
        writeln!(w, "{}  ({state})", self.formatted)
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(w, self).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}  {}  {}",
            self.is_running, self.elapsed_ms, self.formatted
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["RUNNING", "ELAPSED_MS", "ELAPSED"]
    }
}
