use std::os::fd::OwnedFd;

use nix::fcntl::OFlag;
use nix::unistd::{pipe2, Pid};

use super::error::ShellError;
use super::spawn::wait_for;

/// The conduit between two adjacent stages.
pub struct PipeChannel {
    pub read: OwnedFd,
    pub write: OwnedFd,
}

impl PipeChannel {
    /// Both ends are close-on-exec; a child only keeps the end it `dup2`s
    /// onto its standard streams.
    pub fn open() -> Result<Self, ShellError> {
        let (read, write) = pipe2(OFlag::O_CLOEXEC).map_err(ShellError::Pipe)?;
        Ok(PipeChannel { read, write })
    }
}

/// Plumbing shared by the stages of one command line.
///
/// Holds the read end left behind by the previous stage and the children
/// that have been started but not yet reaped. Children are reaped only once
/// the final stage exists, so no producer is ever waited on while its
/// consumer is missing.
#[derive(Default)]
pub struct PipelineContext {
    upstream: Option<OwnedFd>,
    pending: Vec<Pid>,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read end the next stage must take its input from, if any.
    pub fn take_upstream(&mut self) -> Option<OwnedFd> {
        self.upstream.take()
    }

    pub fn set_upstream(&mut self, read: OwnedFd) {
        if self.upstream.replace(read).is_some() {
            tracing::warn!(target: "exec", "dropping an unconsumed pipe read end");
        }
    }

    pub fn add_pending(&mut self, pid: Pid) {
        self.pending.push(pid);
    }

    pub fn pending(&self) -> &[Pid] {
        &self.pending
    }

    pub fn is_idle(&self) -> bool {
        self.upstream.is_none() && self.pending.is_empty()
    }

    /// Reap every pending child in the order they were started.
    pub fn reap_pending(&mut self) {
        for pid in self.pending.drain(..) {
            wait_for(pid);
        }
    }

    /// Tear the pipeline down: close the dangling read end so producers see
    /// a broken pipe, then reap them.
    pub fn abort(&mut self) {
        self.upstream = None;
        self.reap_pending();
    }
}

impl Drop for PipelineContext {
    fn drop(&mut self) {
        if !self.is_idle() {
            self.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn test_channel_carries_bytes() {
        let channel = PipeChannel::open().unwrap();
        let mut writer = std::fs::File::from(channel.write);
        writer.write_all(b"ping").unwrap();
        drop(writer);
        let mut out = String::new();
        std::fs::File::from(channel.read).read_to_string(&mut out).unwrap();
        assert_eq!(out, "ping");
    }

    #[test]
    fn test_context_upstream_handoff() {
        let mut context = PipelineContext::new();
        assert!(context.is_idle());
        let channel = PipeChannel::open().unwrap();
        context.set_upstream(channel.read);
        assert!(!context.is_idle());
        assert!(context.take_upstream().is_some());
        assert!(context.take_upstream().is_none());
        assert!(context.is_idle());
    }

    #[test]
    fn test_abort_clears_everything() {
        let mut context = PipelineContext::new();
        let channel = PipeChannel::open().unwrap();
        context.set_upstream(channel.read);
        context.abort();
        assert!(context.is_idle());
        assert!(context.pending().is_empty());
    }
}
