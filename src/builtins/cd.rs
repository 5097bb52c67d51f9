use std::env;
use crate::engine::state::{ExecutionResult, ShellState};
use crate::builtins::registry::CommandInfo;

pub const COMMAND_INFO_CD: CommandInfo = CommandInfo {
    name: "cd",
    run: cd_runner,
};

pub const COMMAND_INFO_PWD: CommandInfo = CommandInfo {
    name: "pwd",
    run: pwd_runner,
};

pub fn pwd_runner(_args: &[String], _state: &mut ShellState) -> (ExecutionResult, i32) {
    (ExecutionResult::KeepRunning, pwd())
}

pub fn cd_runner(args: &[String], state: &mut ShellState) -> (ExecutionResult, i32) {
    match run(args, state) {
        Ok(()) => (ExecutionResult::KeepRunning, 0),
        Err(e) => {
            println!("fsh: cd: {}", e);
            (ExecutionResult::KeepRunning, 1)
        }
    }
}

pub fn run(args: &[String], state: &mut ShellState) -> Result<(), String> {
    let current = env::current_dir().map_err(|e| e.to_string())?;

    let target = match args.first().map(String::as_str) {
        None => dirs::home_dir().ok_or("could not find home directory".to_string())?,
        Some("-") => state.previous_dir.clone().ok_or("previous directory not set".to_string())?,
        Some(dir) => crate::engine::expand_home(dir),
    };

    if env::set_current_dir(&target).is_err() {
        return Err(format!("no such file or directory: {}", target.display()));
    }

    state.previous_dir = Some(current);
    Ok(())
}

pub fn pwd() -> i32 {
    match env::current_dir() {
        Ok(path) => {
            println!("{}", path.display());
            0
        }
        Err(e) => {
            println!("fsh: pwd: {}", e);
            1
        }
    }
}
