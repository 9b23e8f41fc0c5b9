//! Utility functions for use in other parts of minwm
use crate::Result;

use nix::unistd::setsid;
use std::{
    os::unix::process::CommandExt,
    process::{Command, Stdio},
};
use tracing::debug;

/// Run an external command, detached from the window manager.
///
/// The child is moved into its own session so it outlives the window
/// manager and is never signalled alongside it, and its stdout and stderr
/// are redirected to /dev/null. The X connection socket is opened close on
/// exec, so children never hold a duplicate connection to the server.
pub fn spawn<S: Into<String>>(cmd: S) -> Result<()> {
    let s = cmd.into();
    debug!(cmd = %s, "spawning subprocess");

    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.is_empty() {
        return Ok(());
    }

    let mut command = Command::new(parts[0]);
    command
        .args(&parts[1..])
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    unsafe {
        command.pre_exec(|| {
            // Errors only mean we are already a session leader
            let _ = setsid();
            Ok(())
        });
    }

    command.spawn()?;

    Ok(())
}
