use std::io::Write;
use std::os::fd::{AsFd, OwnedFd};

use nix::unistd::Pid;

use crate::builtins;
use crate::parser::{self, Invocation, Placement, StageRunner};

use super::error::ShellError;
use super::path::find_executable;
use super::pipeline::{PipeChannel, PipelineContext};
use super::spawn::{spawn, wait_for};
use super::state::{ExecutionResult, ShellState};

/// Status recorded for a line rejected by the parser.
pub const PARSE_ERROR_STATUS: i32 = 2;

// ── Stage orchestration ───────────────────────────────────────────────────

/// Runs the stages of one command line as the parser produces them.
pub struct Executor<'s> {
    state: &'s mut ShellState,
    context: PipelineContext,
}

impl<'s> Executor<'s> {
    pub fn new(state: &'s mut ShellState) -> Self {
        Executor { state, context: PipelineContext::new() }
    }

    /// Run one stage.
    ///
    /// A piped stage returns a provisional `0` as soon as it is started; the
    /// final stage waits for itself, then reaps every earlier stage of the
    /// pipeline and returns its own status.
    pub fn dispatch(&mut self, invocation: &Invocation, placement: Placement) -> i32 {
        let upstream = self.context.take_upstream();
        let downstream = match placement {
            Placement::Piped => match PipeChannel::open() {
                Ok(channel) => Some(channel),
                Err(e) => {
                    report(&e);
                    drop(upstream);
                    return e.status();
                }
            },
            Placement::Final => None,
        };

        let status = if let Some(info) = builtins::registry::find_command(invocation.name()) {
            // Builtins run in the shell itself and never see the pipe; the
            // next stage reads end-of-file.
            drop(upstream);
            tracing::debug!(target: "exec", "builtin: {}", invocation);
            let (result, code) = (info.run)(invocation.args(), self.state);
            if result == ExecutionResult::Exit {
                self.state.exit_requested = true;
            }
            code
        } else {
            let stdout = downstream.as_ref().map(|channel| &channel.write);
            match self.start(invocation, upstream, stdout) {
                Ok(pid) => match placement {
                    Placement::Piped => {
                        self.context.add_pending(pid);
                        0
                    }
                    Placement::Final => wait_for(pid),
                },
                Err(e) => {
                    report(&e);
                    e.status()
                }
            }
        };

        if let Some(channel) = downstream {
            // The write end is dropped here, leaving the child's copy as the
            // only writer.
            self.context.set_upstream(channel.read);
        }
        if placement == Placement::Final {
            self.context.reap_pending();
        }
        status
    }

    /// Resolve and fork one external stage. `stdin` is closed in the shell
    /// once the child holds its own copy.
    fn start(
        &self,
        invocation: &Invocation,
        stdin: Option<OwnedFd>,
        stdout: Option<&OwnedFd>,
    ) -> Result<Pid, ShellError> {
        let search_path = self.state.env.search_path();
        let resolved = find_executable(invocation.name(), search_path.as_deref())
            .ok_or_else(|| ShellError::CommandNotFound(invocation.name().to_string()))?;
        let envp = self.state.env.child_environment();

        tracing::debug!(target: "exec", "spawning {} as {}", invocation, resolved.display());
        // Anything still buffered would otherwise be printed by the child too.
        let _ = std::io::stdout().flush();
        spawn(
            &resolved,
            invocation.argv(),
            &envp,
            stdin.as_ref().map(|fd| fd.as_fd()),
            stdout.map(|fd| fd.as_fd()),
        )
    }
}

impl StageRunner for Executor<'_> {
    fn run_stage(&mut self, invocation: Invocation, placement: Placement) -> i32 {
        let status = self.dispatch(&invocation, placement);
        if placement == Placement::Final {
            self.state.env.set_last_status(status);
        }
        status
    }

    fn abort(&mut self) {
        self.context.abort();
        self.state.env.set_last_status(PARSE_ERROR_STATUS);
    }
}

fn report(error: &ShellError) {
    println!("fsh: {}", error);
}

// ── Command line ──────────────────────────────────────────────────────────

/// Parse and run one command line.
pub fn execute_line(line: &str, state: &mut ShellState) -> ExecutionResult {
    {
        let mut executor = Executor::new(state);
        if let Err(e) = parser::parse_line(line, &mut executor) {
            tracing::debug!(target: "parse", "line rejected: {}", e);
        }
    }

    if state.exit_requested {
        ExecutionResult::Exit
    } else {
        ExecutionResult::KeepRunning
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
