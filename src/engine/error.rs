use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

/// Status recorded when a child was killed by a signal or could not be
/// started at all.
pub const ABNORMAL_STATUS: i32 = -1;

/// Status of a stage whose command could not be found.
pub const NOT_FOUND_STATUS: i32 = 127;

/// Status of a stage whose program was found but could not be executed.
pub const EXEC_FAILED_STATUS: i32 = 126;

/// Errors raised while running one pipeline stage.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("cannot create pipe: {0}")]
    Pipe(Errno),

    #[error("cannot start '{0}': {1}")]
    SpawnFailed(String, Errno),

    #[error("{}: {}", .0.display(), .1.desc())]
    ExecFailed(PathBuf, Errno),
}

impl ShellError {
    /// Exit status recorded for a stage that failed this way.
    pub fn status(&self) -> i32 {
        match self {
            ShellError::CommandNotFound(_) => NOT_FOUND_STATUS,
            ShellError::ExecFailed(..) => EXEC_FAILED_STATUS,
            ShellError::Pipe(_) | ShellError::SpawnFailed(..) => ABNORMAL_STATUS,
        }
    }
}
