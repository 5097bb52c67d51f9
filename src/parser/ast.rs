use std::fmt;

// ── Tokens ─────────────────────────────────────────────────────────────────

/// Longest accepted argument vector, command name included. Tokens past
/// this are dropped without error.
pub const MAX_ARGUMENTS: usize = 20;

/// A lexical unit of one command line.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token<'a> {
    /// Any whitespace-delimited word that is not a lone `|`.
    Word(&'a str),
    /// `|`
    Pipe,
    /// Synthesized once after the last word of the line.
    EndOfLine,
}

impl<'a> Token<'a> {
    /// Classify one whitespace-delimited word. Characters inside a word are
    /// never interpreted, so `a|b` stays a single word.
    pub fn classify(word: &'a str) -> Self {
        if word == "|" { Token::Pipe } else { Token::Word(word) }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => write!(f, "'{}'", w),
            Token::Pipe => write!(f, "'|'"),
            Token::EndOfLine => write!(f, "newline"),
        }
    }
}

// ── Invocations ────────────────────────────────────────────────────────────

/// One command of a pipeline: the command name followed by its arguments.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Invocation {
    argv: Vec<String>,
}

impl Invocation {
    pub fn new(name: &str) -> Self {
        let mut argv = Vec::with_capacity(MAX_ARGUMENTS);
        argv.push(name.to_string());
        Invocation { argv }
    }

    /// Append an argument. Returns `false` when the invocation is full and
    /// the argument was dropped.
    pub fn push(&mut self, arg: &str) -> bool {
        if self.argv.len() >= MAX_ARGUMENTS {
            return false;
        }
        self.argv.push(arg.to_string());
        true
    }

    pub fn name(&self) -> &str {
        &self.argv[0]
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

/// Where a dispatched stage sits in its pipeline.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Placement {
    /// The stage's standard output feeds the next stage.
    Piped,
    /// Last stage of the line (possibly the only one).
    Final,
}
