//! Logging setup and pipeline phase names.
//!
//! All diagnostics go to stderr so stdout only ever carries the handoff
//! document.

use std::fmt;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "FNSPEC_LOG";

/// Stages of one extraction run, recorded on spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPhase {
    /// Walking the input directory for packages
    Discovery,
    /// Parsing package sources
    Parsing,
    /// Searching packages for the contract
    Locating,
    /// Resolving field types and aliases
    Resolving,
    /// Writing the handoff document
    Handoff,
}

impl fmt::Display for ExtractionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovery => write!(f, "discovery"),
            Self::Parsing => write!(f, "parsing"),
            Self::Locating => write!(f, "locating"),
            Self::Resolving => write!(f, "resolving"),
            Self::Handoff => write!(f, "handoff"),
        }
    }
}

/// Default filter directive for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "fnspec=warn",
        1 => "fnspec=info",
        2 => "fnspec=debug",
        _ => "fnspec=trace",
    }
}

/// Colour only an interactive stderr, and never when `NO_COLOR` is set.
pub fn use_ansi(no_color: bool, stderr_is_terminal: bool) -> bool {
    !no_color && stderr_is_terminal
}

/// Install the global stderr subscriber.
///
/// `FNSPEC_LOG` wins over the verbosity flag when set. Calling this twice is
/// harmless; the second install is ignored.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let ansi = use_ansi(
        std::env::var_os("NO_COLOR").is_some(),
        std::io::stderr().is_terminal(),
    );

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
