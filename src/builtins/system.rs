use crate::engine::state::{ExecutionResult, ShellState};
use crate::builtins::registry::CommandInfo;

pub const COMMAND_INFO_QUIT: CommandInfo = CommandInfo {
    name: "quit",
    run: quit_runner,
};

pub fn quit_runner(_args: &[String], _state: &mut ShellState) -> (ExecutionResult, i32) {
    (ExecutionResult::Exit, 0)
}
