//! The logging contract shared by importers and the host application.

use crate::severity::{Severity, SeverityMask};
use crate::stream::LogStream;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How much a logger lets through before dispatch.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Debugging messages are dropped; everything else is delivered.
    Normal,
    /// Every message is delivered.
    #[default]
    Verbose,
}

impl Verbosity {
    /// Returns `true` if messages of `severity` pass this verbosity.
    pub fn admits(self, severity: Severity) -> bool {
        self == Verbosity::Verbose || severity != Severity::Debugging
    }
}

/// Base logging interface used by every importer.
///
/// Messages are plain text; a logger applies no formatting of its own.
/// Attached streams receive the message together with its severity.
pub trait Logger: Send + Sync {
    /// Logs `message` with the given severity.
    fn log(&self, severity: Severity, message: &str);

    /// Attaches `stream` for the severities in `mask`. An empty mask attaches
    /// it for every severity. Attaching an already attached stream adds the
    /// new severities to its existing ones.
    fn attach_stream(&self, stream: Arc<dyn LogStream>, mask: SeverityMask);

    /// Detaches `stream` from the severities in `mask`. An empty mask detaches
    /// it completely. Detaching a stream that is not attached does nothing.
    fn detach_stream(&self, stream: &Arc<dyn LogStream>, mask: SeverityMask);

    /// Writes a debug message to the log.
    fn debug(&self, message: &str) {
        self.log(Severity::Debugging, message);
    }

    /// Writes an info message to the log.
    fn info(&self, message: &str) {
        self.log(Severity::Info, message);
    }

    /// Writes a warn message to the log.
    fn warn(&self, message: &str) {
        self.log(Severity::Warn, message);
    }

    /// Writes an error message to the log.
    fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }
}

/// A logger that discards every message and ignores every stream.
///
/// Useful as a placeholder where an importer requires a [`Logger`] but the
/// host has not configured any output.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _severity: Severity, _message: &str) {}

    fn attach_stream(&self, _stream: Arc<dyn LogStream>, _mask: SeverityMask) {}

    fn detach_stream(&self, _stream: &Arc<dyn LogStream>, _mask: SeverityMask) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::StreamError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(AtomicUsize);

    impl LogStream for Counting {
        fn write(&self, _message: &str, _severity: Severity) -> Result<(), StreamError> {
            self.0.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    #[test]
    fn verbosity_admits() {
        assert!(Verbosity::Verbose.admits(Severity::Debugging));
        assert!(!Verbosity::Normal.admits(Severity::Debugging));
        assert!(Verbosity::Normal.admits(Severity::Info));
        assert!(Verbosity::Normal.admits(Severity::Error));
    }

    #[test]
    fn default_is_verbose() {
        assert_eq!(Verbosity::default(), Verbosity::Verbose);
    }

    #[test]
    fn null_logger_never_writes() {
        let counting = Arc::new(Counting(AtomicUsize::new(0)));
        let stream: Arc<dyn LogStream> = counting.clone();
        let logger = NullLogger;
        logger.attach_stream(Arc::clone(&stream), SeverityMask::ALL);
        logger.debug("a");
        logger.info("b");
        logger.warn("c");
        logger.error("d");
        logger.detach_stream(&stream, SeverityMask::ALL);
        assert_eq!(counting.0.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn usable_as_trait_object() {
        let logger: Box<dyn Logger> = Box::new(NullLogger);
        logger.info("nothing happens");
    }
}
