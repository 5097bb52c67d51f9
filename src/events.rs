use std::fmt::Display;

use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer,
};

/// Type of event to trace.
#[derive(Clone, Debug, Eq, Hash, PartialEq, clap::ValueEnum)]
pub enum TraceEvent {
    /// Traces tokens and parser state transitions.
    #[clap(name = "parse")]
    Parse,
    /// Traces process creation, waiting and reaping.
    #[clap(name = "exec")]
    Exec,
}

impl TraceEvent {
    /// The `tracing` target the event's messages are emitted under.
    pub fn target(&self) -> &'static str {
        match self {
            TraceEvent::Parse => "parse",
            TraceEvent::Exec => "exec",
        }
    }
}

impl Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.target())
    }
}

fn compose_filter(enabled: &[TraceEvent]) -> Targets {
    enabled.iter().fold(
        Targets::new().with_default(LevelFilter::WARN),
        |filter, event| filter.with_target(event.target(), LevelFilter::DEBUG),
    )
}

/// Install a stderr subscriber: warnings always, debug output for the
/// enabled events.
pub fn init(enabled: &[TraceEvent]) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_filter(compose_filter(enabled));

    if tracing_subscriber::registry().with(layer).try_init().is_err() {
        // Something went wrong; proceed on anyway but complain audibly.
        eprintln!("warning: failed to initialize tracing.");
    }
}
