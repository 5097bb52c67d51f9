use crate::engine::state::{ExecutionResult, ShellState};
use crate::builtins::registry::CommandInfo;
use crate::parser::expand_message;

pub const COMMAND_INFO: CommandInfo = CommandInfo {
    name: "echo",
    run,
};

pub fn run(args: &[String], state: &mut ShellState) -> (ExecutionResult, i32) {
    match expand_message(&args.join(" "), &state.env) {
        Ok(text) => {
            println!("{}", text);
            (ExecutionResult::KeepRunning, 0)
        }
        Err(e) => {
            println!("fsh: echo: {}", e);
            (ExecutionResult::KeepRunning, 1)
        }
    }
}
