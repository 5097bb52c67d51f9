use crate::engine::state::{ExecutionResult, ShellState};
use crate::engine::Environment;
use crate::builtins::registry::CommandInfo;

pub const COMMAND_INFO: CommandInfo = CommandInfo {
    name: "export",
    run: export_runner,
};

pub fn export_runner(args: &[String], state: &mut ShellState) -> (ExecutionResult, i32) {
    (ExecutionResult::KeepRunning, run(args, &mut state.env))
}

/// Run the `export` builtin.
///
/// Behaviour:
/// - `export`             → print all variables, sorted
/// - `export name=value`  → set the variable; children see it from now on
/// - anything else        → status 1 (name and value must both be present)
pub fn run(args: &[String], env: &mut Environment) -> i32 {
    if args.is_empty() {
        for key in env.keys() {
            if let Some(value) = env.lookup(key) {
                println!("export {}='{}'", key, value);
            }
        }
        return 0;
    }

    let mut status = 0;
    for arg in args {
        match arg.split_once('=') {
            Some((name, value)) if !name.is_empty() && !value.is_empty() => {
                env.insert(name, value);
            }
            _ => {
                println!("fsh: export: '{}': expected NAME=VALUE", arg);
                status = 1;
            }
        }
    }
    status
}
