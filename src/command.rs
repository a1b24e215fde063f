use std::io;
use std::process::Command;

/// Captured result of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited with status zero.
    pub success: bool,
    /// Combined stdout and stderr.
    pub output: String,
}

/// Runs a single command line to completion and captures its output.
///
/// Every invocation blocks the calling thread until the subprocess
/// exits; there is no timeout or cancellation.
pub trait CommandRunner {
    fn run(&self, line: &str) -> io::Result<CommandOutput>;
}

/// Command runner backed by `sh -c`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Shell;

impl CommandRunner for Shell {
    fn run(&self, line: &str) -> io::Result<CommandOutput> {
        let result = Command::new("sh").arg("-c").arg(line).output()?;
        let mut output = String::from_utf8_lossy(&result.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&result.stderr));
        Ok(CommandOutput {
            success: result.status.success(),
            output,
        })
    }
}
