//! Configuration types deserialized from `aiport.toml`.

use aiport_log::{Severity, SeverityMask, Verbosity};
use serde::Deserialize;

/// The top-level logging configuration.
///
/// ```toml
/// [logger]
/// verbosity = "normal"
/// thread_tag = true
///
/// [[streams]]
/// kind = "stderr"
/// severities = ["warn", "error"]
///
/// [[streams]]
/// kind = "file"
/// path = "AssimpLog.txt"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct LogConfig {
    /// Settings that apply to the bus itself.
    #[serde(default)]
    pub logger: LoggerSection,
    /// Streams attached when the bus is built, in declaration order.
    #[serde(default)]
    pub streams: Vec<StreamConfig>,
}

/// Bus-wide settings.
#[derive(Debug, Deserialize)]
pub struct LoggerSection {
    /// Whether debugging messages are delivered.
    #[serde(default)]
    pub verbosity: Verbosity,
    /// Whether built-in streams prefix lines with the emitting thread.
    #[serde(default = "default_thread_tag")]
    pub thread_tag: bool,
}

impl Default for LoggerSection {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::default(),
            thread_tag: default_thread_tag(),
        }
    }
}

fn default_thread_tag() -> bool {
    true
}

/// One stream to attach at startup.
#[derive(Debug, Deserialize)]
pub struct StreamConfig {
    /// Where the stream writes.
    pub kind: StreamKind,
    /// Log file path; required for `kind = "file"` and rejected otherwise.
    #[serde(default)]
    pub path: Option<String>,
    /// Severities the stream receives. Empty means all.
    #[serde(default)]
    pub severities: Vec<Severity>,
}

impl StreamConfig {
    /// The subscription mask described by `severities`.
    pub fn mask(&self) -> SeverityMask {
        self.severities.iter().copied().collect::<SeverityMask>().normalized()
    }
}

/// The destination of a configured stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
    /// Forwarded as `tracing` events.
    Tracing,
    /// A log file, created or truncated at startup.
    File,
}
