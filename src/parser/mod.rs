mod ast;
mod combinators;
mod expand;
mod fsm;

// Re-export the public surface so that callers only need `crate::parser::*`.
pub use ast::{Invocation, Placement, Token, MAX_ARGUMENTS};
pub use combinators::tokenize;
pub use expand::{expand_message, ExpandError};
pub use fsm::{CommandLine, ParseError, StageRunner, State};

// ── Public API ────────────────────────────────────────────────────────────

/// Parse one command line, handing every completed stage to `runner` in
/// left-to-right order.
///
/// Stops at the first syntax error; the diagnostic has already been
/// printed and `runner` has been told to abort by then.
pub fn parse_line<R: StageRunner + ?Sized>(line: &str, runner: &mut R) -> Result<(), ParseError> {
    let mut machine = CommandLine::new(runner);
    for token in tokenize(line) {
        if !machine.handle_event(token) {
            break;
        }
    }
    machine.finish()
}

// ── Tests ──────────────────────────────────────────────────────────────────
