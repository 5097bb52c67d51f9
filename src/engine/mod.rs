mod env;
mod error;
mod execution;
pub mod path;
mod pipeline;
mod spawn;
pub mod state;

// Re-export the public API so that external code (`main.rs`, `builtins/`, `parser/`)
// can use `engine::ShellState`, `engine::execute_line`, etc.
pub use env::{Environment, LAST_STATUS_KEY};
pub use error::{ShellError, ABNORMAL_STATUS, EXEC_FAILED_STATUS, NOT_FOUND_STATUS};
pub use execution::{execute_line, Executor, PARSE_ERROR_STATUS};
pub use path::{expand_home, find_executable};
pub use pipeline::{PipeChannel, PipelineContext};
pub use state::{ExecutionResult, ShellState};
