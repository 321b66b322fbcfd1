//! Errors surfaced to callers of the logging API.

/// Errors caused by invalid input to the logging API.
///
/// Ordinary operation (an empty registry, a severity no stream listens for,
/// a failing stream) never produces a `LogError`. Only malformed caller input
/// does.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// A raw severity mask carried bits outside the four known severities.
    #[error("severity mask {0:#x} contains unknown bits")]
    UnknownSeverityBits(u32),
}
