use std::io::{self, BufRead};

use crate::engine::{execute_line, ExecutionResult, ShellState};

/// Longest accepted command line, in bytes, counting the terminator.
pub const MAX_LINE_LENGTH: usize = 100;

pub const PROMPT: &str = "$ ";

/// Cut `line` down to what the shell accepts, on a character boundary.
pub fn clip_line(line: &str) -> &str {
    let limit = MAX_LINE_LENGTH - 1;
    if line.len() <= limit {
        return line;
    }
    let mut end = limit;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    tracing::warn!("line longer than {} bytes, truncated", limit);
    &line[..end]
}

/// Run every line of `reader` until it is exhausted or `quit` is issued.
///
/// With `echo`, each line is printed after the prompt before it runs, so a
/// transcript of a script reads like an interactive session.
pub fn run_reader<R: BufRead>(reader: R, state: &mut ShellState, echo: bool) -> io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        let input = clip_line(&line);
        if echo {
            println!("{}{}", PROMPT, input);
        }
        if execute_line(input, state) == ExecutionResult::Exit {
            break;
        }
    }
    Ok(())
}
