use std::path::PathBuf;

use clap::Parser;

use crate::events::TraceEvent;

/// Parsed command-line arguments for the shell.
#[derive(Parser, Debug)]
#[clap(name = "fsh", version, about = "A small shell with a table-driven pipeline parser.")]
pub struct CommandLineArgs {
    /// Read commands from this file instead of the terminal; each line is
    /// echoed after the prompt before it runs.
    pub script: Option<PathBuf>,

    /// Enable debug tracing for the given events.
    #[clap(long = "trace", value_enum, value_delimiter = ',')]
    pub trace: Vec<TraceEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let args = CommandLineArgs::try_parse_from(["fsh"]).unwrap();
        assert!(args.script.is_none());
        assert!(args.trace.is_empty());
    }

    #[test]
    fn test_script_and_trace() {
        let args = CommandLineArgs::try_parse_from(["fsh", "--trace", "parse,exec", "cmds.txt"]).unwrap();
        assert_eq!(args.script, Some(PathBuf::from("cmds.txt")));
        assert_eq!(args.trace, vec![TraceEvent::Parse, TraceEvent::Exec]);
    }

    #[test]
    fn test_unknown_trace_event() {
        assert!(CommandLineArgs::try_parse_from(["fsh", "--trace", "jobs"]).is_err());
    }
}
