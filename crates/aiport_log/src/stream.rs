//! The capability a message consumer implements to receive log output.

use crate::severity::Severity;
use std::sync::Arc;

/// A destination for log messages: a console, a file, a UI pane.
///
/// Streams are shared as `Arc<dyn LogStream>`. The bus identifies a stream by
/// the allocation behind that handle, so clones of one `Arc` refer to the same
/// subscription while two separately allocated streams never do.
pub trait LogStream: Send + Sync {
    /// Writes one message.
    ///
    /// An `Err` (or a panic) is contained by the caller and does not affect
    /// delivery to other streams.
    fn write(&self, message: &str, severity: Severity) -> Result<(), StreamError>;

    /// A short name used when reporting delivery failures.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A failure reported by [`LogStream::write`].
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The underlying writer failed.
    #[error("stream I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stream no longer accepts messages.
    #[error("stream is closed")]
    Closed,

    /// The stream refused the message for its own reason.
    #[error("stream rejected message: {0}")]
    Rejected(String),
}

/// Returns `true` if both handles point at the same stream.
///
/// Only the data pointer is compared; vtable pointers for the same type may
/// differ between codegen units.
pub(crate) fn same_stream(a: &Arc<dyn LogStream>, b: &Arc<dyn LogStream>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
