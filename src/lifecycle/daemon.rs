//! Daemonization: detach from the controlling terminal.
//!
//! Fork into the background, create a new session, reset the umask,
//! change the working directory to `/`, and point the three standard
//! streams at `/dev/null`. The parent never proceeds to the accept loop;
//! it reports the child pid and exits. Any failure here is fatal.
//!
//! Must run before the async runtime starts: forking a process with
//! live runtime threads is not sound.

// Process detachment requires raw fork()/dup2() calls.
#![allow(unsafe_code)]

use std::fs::File;
use std::os::fd::AsRawFd;

use nix::sys::stat::{umask, Mode};
use nix::unistd::{chdir, fork, setsid, ForkResult};
use thiserror::Error;

/// Fatal errors during detachment.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("fork failed: {0}")]
    Fork(#[source] nix::Error),

    #[error("setsid failed: {0}")]
    Setsid(#[source] nix::Error),

    #[error("chdir to / failed: {0}")]
    Chdir(#[source] nix::Error),

    #[error("failed to open /dev/null: {0}")]
    DevNull(#[source] std::io::Error),

    #[error("failed to redirect standard streams: {0}")]
    Redirect(#[source] std::io::Error),
}

/// Detach the process into the background.
///
/// Returns in the child only; the parent prints the child pid and exits
/// with success.
pub fn daemonize() -> Result<(), DaemonError> {
    // Safety: called from main before any threads are spawned.
    match unsafe { fork() }.map_err(DaemonError::Fork)? {
        ForkResult::Parent { child } => {
            println!("server pid is: {}", child);
            std::process::exit(0);
        }
        ForkResult::Child => {}
    }

    setsid().map_err(DaemonError::Setsid)?;
    umask(Mode::empty());
    chdir("/").map_err(DaemonError::Chdir)?;
    redirect_stdio()
}

/// Point stdin, stdout, and stderr at /dev/null so the daemon holds no
/// reference to the terminal.
fn redirect_stdio() -> Result<(), DaemonError> {
    let devnull = File::options()
        .read(true)
        .write(true)
        .open("/dev/null")
        .map_err(DaemonError::DevNull)?;
    let fd = devnull.as_raw_fd();

    for target in 0..=2 {
        // Safety: dup2 over the standard descriptors with a valid source fd.
        if unsafe { libc::dup2(fd, target) } == -1 {
            return Err(DaemonError::Redirect(std::io::Error::last_os_error()));
        }
    }
    Ok(())
}
