//! `fsh`: a line-oriented shell.
//!
//! Each input line is split into whitespace-delimited tokens and fed to a
//! table-driven state machine ([`parser`]). Completed pipeline stages are
//! handed to the [`engine`], which runs builtins in-process and forks
//! everything else with its standard streams wired through pipes.

#[cfg(not(unix))]
compile_error!("fsh needs fork/exec and only builds on Unix platforms");

pub mod args;
pub mod builtins;
pub mod engine;
pub mod events;
pub mod input;
pub mod parser;
mod signals;
