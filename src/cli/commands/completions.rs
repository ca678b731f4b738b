//! `mstudy completions` command - Shell completion scripts
//!
//! `source <(mstudy completions bash)` in `~/.bashrc`, or write the fish
//! script to `~/.config/fish/completions/mstudy.fish`.

use clap::CommandFactory;
use clap_complete::Shell;
use miette::Result;
use std::io::{self, Write};

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout());
    Ok(())
}

/// Completion script for `shell`, named after the binary
fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_script_lists_subcommands() {
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("mstudy"));
        assert!(script.contains("readiness"));
        assert!(script.contains("push"));
    }
}
