use crate::engine::{ExecutionResult, ShellState};
use crate::builtins;

pub type BuiltinRunner = fn(&[String], &mut ShellState) -> (ExecutionResult, i32);

pub struct CommandInfo {
    pub name: &'static str,
    pub run: BuiltinRunner,
}

pub const BUILTINS: &[CommandInfo] = &[
    builtins::cd::COMMAND_INFO_CD,
    builtins::cd::COMMAND_INFO_PWD,
    builtins::echo::COMMAND_INFO,
    builtins::export::COMMAND_INFO,
    builtins::system::COMMAND_INFO_QUIT,
    builtins::unset::COMMAND_INFO,
    builtins::which::COMMAND_INFO,
];

pub fn find_command(name: &str) -> Option<&'static CommandInfo> {
    BUILTINS.iter().find(|cmd| cmd.name == name)
}

pub fn is_builtin(name: &str) -> bool {
    find_command(name).is_some()
}
