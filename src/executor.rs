use crate::config::Config;
use anyhow::Result;
use appdex::AppEntry;
use std::process::{Command, Stdio};

/// Launches the given entry detached from this process, wrapping it with the
/// configured terminal when the entry asks for one.
pub fn execute(entry: &AppEntry, config: &Config) -> Result<()> {
    let mut cmd_parts: Vec<&str> = Vec::new();

    if entry.terminal {
        if let Some(term_cmd) = &config.general.terminal {
            cmd_parts.extend(term_cmd.split_whitespace());
        }
    }
    cmd_parts.extend(entry.exec.split_whitespace());

    if cmd_parts.is_empty() {
        return Ok(());
    }

    let mut command = Command::new(cmd_parts[0]);
    command
        .args(&cmd_parts[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    command.spawn()?;

    Ok(())
}
