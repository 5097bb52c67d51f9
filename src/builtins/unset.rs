use crate::engine::state::{ExecutionResult, ShellState};
use crate::engine::Environment;
use crate::builtins::registry::CommandInfo;

pub const COMMAND_INFO: CommandInfo = CommandInfo {
    name: "unset",
    run: unset_runner,
};

pub fn unset_runner(args: &[String], state: &mut ShellState) -> (ExecutionResult, i32) {
    (ExecutionResult::KeepRunning, run(args, &mut state.env))
}

/// Run the `unset` builtin.
///
/// Behaviour:
/// - `unset name …` → remove each named variable; unknown names are ignored
/// - `unset`        → status 1
pub fn run(args: &[String], env: &mut Environment) -> i32 {
    if args.is_empty() {
        println!("fsh: unset: variable name required");
        return 1;
    }

    for arg in args {
        env.remove(arg);
    }
    0
}
