use crate::engine::state::{ExecutionResult, ShellState};
use crate::engine::path::{find_all_executables, find_executable};
use crate::builtins::registry::{is_builtin, CommandInfo};

pub const COMMAND_INFO: CommandInfo = CommandInfo {
    name: "which",
    run: which_runner,
};

pub fn which_runner(args: &[String], state: &mut ShellState) -> (ExecutionResult, i32) {
    let search_path = state.env.search_path();
    let (lines, all_found) = locate(args, search_path.as_deref());
    for line in &lines {
        println!("{}", line);
    }
    let status = if all_found && !lines.is_empty() { 0 } else { 1 };
    (ExecutionResult::KeepRunning, status)
}

/// Lines `which` prints for `args`, and whether every name resolved.
///
/// `-a` as the first argument lists every match along the path instead of
/// the first one.
pub fn locate(args: &[String], search_path: Option<&str>) -> (Vec<String>, bool) {
    let (all, names) = match args.split_first() {
        Some((flag, rest)) if flag == "-a" => (true, rest),
        _ => (false, args),
    };

    let mut lines = Vec::new();
    let mut missing = false;
    for name in names {
        if is_builtin(name) {
            lines.push(format!("{}: fsh built-in command", name));
            continue;
        }
        let found = if all {
            find_all_executables(name, search_path)
        } else {
            find_executable(name, search_path).into_iter().collect()
        };
        if found.is_empty() {
            missing = true;
        }
        lines.extend(found.into_iter().map(|p| p.display().to_string()));
    }

    (lines, !missing)
}
