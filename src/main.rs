//! minwm: a minimal tiling window manager for X11.
//!
//! There is deliberately no configuration surface here: rebuild with a
//! modified [Config] to change colors, bindings modifier or layout
//! parameters.
use minwm::{new_x11rb_backed_window_manager, Config};

use nix::{
    libc,
    sys::{
        signal::{signal, SigHandler, Signal},
        wait::{waitpid, WaitPidFlag, WaitStatus},
    },
    unistd::Pid,
};
use std::{env, process};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Drain every child that has finished without blocking.
///
/// Runs in signal handling context: nothing here may allocate or lock, and
/// waitpid is the only call made (it is async-signal-safe).
extern "C" fn reap_children(_: libc::c_int) {
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) | Err(_) => break,
            Ok(_) => (),
        }
    }
}

fn main() {
    if env::args().count() > 1 {
        eprintln!("usage: minwm");
        process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish()
        .init();

    // Spawned terminals are reaped as they exit rather than on demand
    if let Err(e) = unsafe { signal(Signal::SIGCHLD, SigHandler::Handler(reap_children)) } {
        eprintln!("unable to install SIGCHLD handler: {e}");
        process::exit(1);
    }

    if let Err(e) = new_x11rb_backed_window_manager(Config::default()).and_then(|wm| wm.run()) {
        eprintln!("fatal: {e}");
        process::exit(1);
    }
}
