use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use fsh::args::CommandLineArgs;
use fsh::engine::{self, ExecutionResult, ShellState};
use fsh::events;
use fsh::input::{self, clip_line, PROMPT};

fn run_interactive(state: &mut ShellState) -> rustyline::Result<()> {
    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let input = clip_line(&line);
                if !input.trim().is_empty() {
                    let _ = rl.add_history_entry(input);
                }
                if engine::execute_line(input, state) == ExecutionResult::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                continue;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = CommandLineArgs::parse();
    events::init(&args.trace);

    let mut state = ShellState::new();

    let result = match &args.script {
        Some(path) => match File::open(path) {
            Ok(file) => input::run_reader(BufReader::new(file), &mut state, true).map_err(|e| e.to_string()),
            Err(e) => Err(format!("{}: {}", path.display(), e)),
        },
        None if io::stdin().is_terminal() => run_interactive(&mut state).map_err(|e| e.to_string()),
        None => input::run_reader(io::stdin().lock(), &mut state, false).map_err(|e| e.to_string()),
    };

    println!();
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fsh: {}", e);
            ExitCode::FAILURE
        }
    }
}
