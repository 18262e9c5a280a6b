//! Logging setup for the lookup service and CLI.
//!
//! Log lines go to stderr so that lookup results on stdout stay
//! machine-readable. The default filter raises the crate's own targets to
//! the requested verbosity but keeps the HTTP stack used by the source
//! adapters at warnings until trace output is asked for.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Targets of the HTTP client stack behind [`crate::sources::ReqwestClient`].
const HTTP_STACK_TARGETS: &[&str] = &["reqwest", "hyper", "hyper_util", "h2", "rustls"];

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Info and above: source registration, timetable loads, source failures.
    #[default]
    Normal,
    /// Debug and above: per-source outcomes and merge decisions.
    Verbose,
    /// Everything, including request traces from the HTTP stack.
    Trace,
}

impl Verbosity {
    /// Map `-q` and repeated `-v` flags to a verbosity. Quiet wins.
    #[must_use]
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Level for `flightinfo` targets.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Level for the HTTP client stack.
    #[must_use]
    pub fn http_stack_level(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal | Self::Verbose => Level::WARN,
            Self::Trace => Level::DEBUG,
        }
    }
}

/// Filter directives used when `RUST_LOG` is not set.
#[must_use]
pub fn default_filter(verbosity: Verbosity) -> String {
    let http_level = verbosity.http_stack_level();
    std::iter::once(format!("flightinfo={}", verbosity.to_level_filter()))
        .chain(
            HTTP_STACK_TARGETS
                .iter()
                .map(|target| format!("{target}={http_level}")),
        )
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `verbosity` when it parses. Calling this
/// more than once is harmless; later calls keep the first subscriber.
///
/// ```no_run
/// use flightinfo::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr),
    );

    let _ = subscriber.try_init();
}

/// Route warnings to the test harness output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
