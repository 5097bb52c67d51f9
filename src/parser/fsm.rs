//! Table-driven state machine turning a token stream into pipeline stages.
//!
//! The machine never branches on its state or on the incoming event: both
//! index [`TRANSITIONS`], which yields the next state and an [`Effect`] tag.
//! Effects build the invocation under construction and hand finished stages
//! to a [`StageRunner`].

use std::fmt;

use thiserror::Error;

use super::ast::{Invocation, Placement, Token};

/// Consumer of the stages produced by the parser.
pub trait StageRunner {
    /// Run one stage and return its (possibly provisional) exit status.
    fn run_stage(&mut self, invocation: Invocation, placement: Placement) -> i32;

    /// The line turned out to be malformed. Release whatever was set up for
    /// stages that were already dispatched.
    fn abort(&mut self);
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("unexpected {token} in state {state}")]
pub struct ParseError {
    pub token: String,
    pub state: State,
}

// ── States, events, effects ────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    Init,
    Command,
    Arguments,
    PipeBoundary,
    Terminal,
}

const STATE_COUNT: usize = 5;

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Init => "Init",
            State::Command => "Command",
            State::Arguments => "Arguments",
            State::PipeBoundary => "PipeBoundary",
            State::Terminal => "Terminal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Event {
    Word,
    Pipe,
    EndOfLine,
}

const EVENT_COUNT: usize = 3;

impl Event {
    fn of(token: Token<'_>) -> Self {
        match token {
            Token::Word(_) => Event::Word,
            Token::Pipe => Event::Pipe,
            Token::EndOfLine => Event::EndOfLine,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Effect {
    Nothing,
    /// Begin a new invocation; the word is the command name.
    Start,
    /// Add the word to the invocation under construction.
    Append,
    /// The invocation is complete and its output goes to a pipe.
    Link,
    /// The pipeline continues: dispatch the linked stage, then start the
    /// next invocation with the word.
    Chain,
    /// Dispatch the invocation under construction as the final stage.
    Execute,
    /// Malformed line.
    Reject,
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    next: State,
    effect: Effect,
}

const fn to(next: State, effect: Effect) -> Transition {
    Transition { next, effect }
}

#[rustfmt::skip]
//                      Word                                   Pipe                                      EndOfLine
static TRANSITIONS: [[Transition; EVENT_COUNT]; STATE_COUNT] = [
    /* Init         */ [to(State::Command, Effect::Start),    to(State::Terminal, Effect::Reject),      to(State::Terminal, Effect::Nothing)],
    /* Command      */ [to(State::Arguments, Effect::Append), to(State::PipeBoundary, Effect::Link),    to(State::Terminal, Effect::Execute)],
    /* Arguments    */ [to(State::Arguments, Effect::Append), to(State::PipeBoundary, Effect::Link),    to(State::Terminal, Effect::Execute)],
    /* PipeBoundary */ [to(State::Command, Effect::Chain),    to(State::Terminal, Effect::Reject),      to(State::Terminal, Effect::Reject)],
    /* Terminal     */ [to(State::Terminal, Effect::Nothing), to(State::Terminal, Effect::Nothing),    to(State::Terminal, Effect::Nothing)],
];

// ── Machine ────────────────────────────────────────────────────────────────

/// Parser state for one command line.
pub struct CommandLine<'r, R: StageRunner + ?Sized> {
    state: State,
    /// Invocation under construction.
    current: Option<Invocation>,
    /// Completed stage waiting for proof that a downstream stage exists.
    linked: Option<Invocation>,
    error: Option<ParseError>,
    runner: &'r mut R,
}

impl<'r, R: StageRunner + ?Sized> CommandLine<'r, R> {
    pub fn new(runner: &'r mut R) -> Self {
        CommandLine { state: State::Init, current: None, linked: None, error: None, runner }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Feed one token. Returns `false` once the machine is terminal.
    pub fn handle_event(&mut self, token: Token<'_>) -> bool {
        let event = Event::of(token);
        let from = self.state;
        let transition = TRANSITIONS[from as usize][event as usize];
        tracing::debug!(target: "parse", "[{}.{:?} -> {}]", from, event, transition.next);

        self.state = transition.next;
        self.perform(transition.effect, token, from);
        self.state != State::Terminal
    }

    /// Consume the machine, reporting the first syntax error if any.
    pub fn finish(mut self) -> Result<(), ParseError> {
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn perform(&mut self, effect: Effect, token: Token<'_>, from: State) {
        match effect {
            Effect::Nothing => {}
            Effect::Start => self.start(token),
            Effect::Append => self.append(token),
            Effect::Link => self.link(),
            Effect::Chain => {
                self.chain();
                self.start(token);
            }
            Effect::Execute => self.execute(),
            Effect::Reject => self.reject(token, from),
        }
    }

    fn start(&mut self, token: Token<'_>) {
        if let Token::Word(name) = token {
            self.current = Some(Invocation::new(name));
        }
    }

    fn append(&mut self, token: Token<'_>) {
        if let (Some(invocation), Token::Word(arg)) = (self.current.as_mut(), token) {
            if !invocation.push(arg) {
                tracing::debug!(
                    target: "parse",
                    "argument limit reached for '{}', dropping '{}'",
                    invocation.name(),
                    arg
                );
            }
        }
    }

    fn link(&mut self) {
        self.linked = self.current.take();
    }

    fn chain(&mut self) {
        if let Some(stage) = self.linked.take() {
            self.runner.run_stage(stage, Placement::Piped);
        }
    }

    fn execute(&mut self) {
        if let Some(stage) = self.current.take() {
            self.runner.run_stage(stage, Placement::Final);
        }
    }

    fn reject(&mut self, token: Token<'_>, from: State) {
        let error = ParseError { token: token.to_string(), state: from };
        println!("fsh: syntax error: {}", error);
        self.current = None;
        self.linked = None;
        self.runner.abort();
        self.error = Some(error);
    }
}
