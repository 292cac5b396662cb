// src/signal.rs

//! Ctrl+C handling.
//!
//! The first SIGINT or SIGTERM only raises a flag that the presentation loop
//! checks once per cycle, same as the window close button. A second one
//! exits immediately.

use anyhow::{Context, Result};
use log::debug;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::os::raw::c_int;
use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_interrupt(_signal: c_int) {
    if INTERRUPTED.swap(true, Ordering::SeqCst) {
        // SAFETY: _exit is async-signal-safe.
        unsafe { nix::libc::_exit(130) };
    }
}

/// Installs the SIGINT/SIGTERM handlers.
pub fn install() -> Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_interrupt),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    for sig in [Signal::SIGINT, Signal::SIGTERM] {
        // SAFETY: the handler only touches an atomic and calls _exit.
        unsafe { signal::sigaction(sig, &action) }
            .with_context(|| format!("Failed to install {} handler", sig))?;
    }
    debug!("signal: Handlers installed");
    Ok(())
}

/// Whether an interrupt has been received since startup.
pub fn interrupt_requested() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}
