//! Severity-tagged diagnostic fan-out for the asset import pipeline.
//!
//! Producers (format loaders, post-processing steps) report messages through
//! the [`Logger`] contract. The thread-safe [`DiagnosticBus`] delivers each
//! message to every attached [`LogStream`] whose [`SeverityMask`] includes the
//! message's [`Severity`]. A stream that fails is contained and never stops
//! delivery to the others.

#![warn(missing_docs)]

pub mod bus;
pub mod error;
pub mod guard;
pub mod logger;
pub mod severity;
pub mod stream;
pub mod streams;

pub use bus::DiagnosticBus;
pub use error::LogError;
pub use guard::StreamGuard;
pub use logger::{Logger, NullLogger, Verbosity};
pub use severity::{Severity, SeverityMask};
pub use stream::{LogStream, StreamError};
pub use streams::{FileStream, LineFormat, StderrStream, StdoutStream, TracingStream};
