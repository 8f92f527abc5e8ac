//! `lc completions` — generate shell completion scripts.

use clap::Args;
use clap_complete::Shell;

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run_completions(args: &CompletionsArgs, cmd: &mut clap::Command) {
    clap_complete::generate(args.shell, cmd, "lc", &mut std::io::stdout());
}
