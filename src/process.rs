//! Helpers shared by the external tool wrappers.

use tokio::process::Command;

/// Start the child in a process group of its own.
///
/// A terminal Ctrl-C signals the whole foreground group. The child must not
/// see it: vidscribe handles the interrupt itself and kills the child on drop.
pub(crate) fn own_process_group(cmd: &mut Command) -> &mut Command {
    #[cfg(unix)]
    cmd.process_group(0);
    cmd
}

/// Last `n` non-empty lines of a tool's stderr. ffmpeg prints its banner
/// first and the actual error last.
pub(crate) fn stderr_tail(stderr: &str, n: usize) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
