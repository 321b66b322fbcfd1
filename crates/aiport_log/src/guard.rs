//! Scoped stream registration.

use crate::bus::DiagnosticBus;
use crate::severity::SeverityMask;
use crate::stream::LogStream;
use std::sync::Arc;

/// Keeps a stream attached to a [`DiagnosticBus`] for as long as it lives.
///
/// Created by [`DiagnosticBus::attach_scoped`]. Dropping the guard detaches
/// the severities it attached; bits contributed by other attach calls for the
/// same stream are only removed where they overlap.
#[must_use = "dropping the guard detaches the stream immediately"]
pub struct StreamGuard {
    bus: Arc<DiagnosticBus>,
    stream: Arc<dyn LogStream>,
    mask: SeverityMask,
    active: bool,
}

impl StreamGuard {
    pub(crate) fn new(
        bus: Arc<DiagnosticBus>,
        stream: Arc<dyn LogStream>,
        mask: SeverityMask,
    ) -> Self {
        Self {
            bus,
            stream,
            mask,
            active: true,
        }
    }

    /// The stream this guard keeps attached.
    pub fn stream(&self) -> &Arc<dyn LogStream> {
        &self.stream
    }

    /// The severities this guard attached.
    pub fn mask(&self) -> SeverityMask {
        self.mask
    }

    /// Detaches the stream now instead of at drop.
    pub fn detach_now(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if std::mem::replace(&mut self.active, false) {
            self.bus.detach_stream(&self.stream, self.mask);
        }
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.release();
    }
}
