use nix::sys::signal::{signal, SigHandler, Signal};

/// Restore default signal handlers in a freshly forked child.
///
/// The Rust runtime starts with `SIGPIPE` ignored, and an ignored signal
/// stays ignored across `execve`. Without this, a producer whose reader has
/// gone away would spin on `EPIPE` instead of terminating.
///
/// # Safety
///
/// Meant to run between `fork` and `execve`; it only calls `sigaction`.
pub unsafe fn restore_default() {
    // SAFETY: installing SIG_DFL does not run any handler code.
    let _ = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) };
}
