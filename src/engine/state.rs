use std::path::PathBuf;

use super::env::Environment;

pub struct ShellState {
    /// Directory `cd -` returns to.
    pub previous_dir: Option<PathBuf>,
    /// Shell variables and the last exit status.
    pub env: Environment,
    /// Set by `quit`; the driver stops after the current line.
    pub exit_requested: bool,
}

impl ShellState {
    pub fn new() -> Self {
        Self::with_environment(init_env_vars())
    }

    pub fn with_environment(env: Environment) -> Self {
        ShellState { previous_dir: None, env, exit_requested: false }
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionResult {
    KeepRunning,
    Exit,
}

/// Seed shell variables from the OS environment, with a default `PATH`
/// when the process was started without one.
fn init_env_vars() -> Environment {
    let mut env = Environment::new();
    for (key, value) in std::env::vars() {
        env.insert(&key, &value);
    }
    if env.lookup("PATH").is_none() {
        env.insert("PATH", "/usr/local/bin:/usr/bin:/bin");
    }
    env
}
