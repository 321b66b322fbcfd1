//! Thread-safe fan-out of log messages to attached streams.

use crate::error::LogError;
use crate::guard::StreamGuard;
use crate::logger::{Logger, Verbosity};
use crate::severity::{Severity, SeverityMask};
use crate::stream::{same_stream, LogStream};
use parking_lot::RwLock;
use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

thread_local! {
    static REPORTING_FAILURE: Cell<bool> = const { Cell::new(false) };
}

/// One registry entry: a stream and the severities it receives.
#[derive(Clone)]
struct Subscription {
    stream: Arc<dyn LogStream>,
    mask: SeverityMask,
}

/// The shared logger that distributes messages to attached streams.
///
/// The host application creates one bus and hands it (usually as an
/// `Arc<DiagnosticBus>`) to every importer that should report through it.
///
/// The registry is published as an immutable snapshot. Attach and detach
/// build a new snapshot under the write lock; [`emit`](Self::emit) grabs the
/// current snapshot and dispatches without holding any lock, so a stream may
/// log, attach or detach from inside its own `write`. Streams are invoked in
/// the order they were first attached.
///
/// A stream that returns an error or panics is skipped for that message.
/// The failure is counted (see [`delivery_failures`](Self::delivery_failures))
/// and reported through `tracing`, never to the emitting caller.
pub struct DiagnosticBus {
    registry: RwLock<Arc<[Subscription]>>,
    verbosity: RwLock<Verbosity>,
    delivery_failures: AtomicUsize,
}

impl DiagnosticBus {
    /// Creates a bus with no attached streams and [`Verbosity::Verbose`].
    pub fn new() -> Self {
        Self::with_verbosity(Verbosity::default())
    }

    /// Creates a bus with no attached streams and the given verbosity.
    pub fn with_verbosity(verbosity: Verbosity) -> Self {
        Self {
            registry: RwLock::new(Arc::from(Vec::new())),
            verbosity: RwLock::new(verbosity),
            delivery_failures: AtomicUsize::new(0),
        }
    }

    /// Returns the current verbosity.
    pub fn verbosity(&self) -> Verbosity {
        *self.verbosity.read()
    }

    /// Changes the verbosity for all subsequent messages.
    pub fn set_verbosity(&self, verbosity: Verbosity) {
        *self.verbosity.write() = verbosity;
    }

    /// Delivers `message` to every stream whose mask contains `severity`.
    ///
    /// Returns once every matching stream has been invoked. Debugging
    /// messages are dropped while the verbosity is [`Verbosity::Normal`].
    pub fn emit(&self, severity: Severity, message: &str) {
        if !self.verbosity().admits(severity) {
            return;
        }
        let snapshot: Arc<[Subscription]> = self.registry.read().clone();
        for sub in snapshot.iter().filter(|sub| sub.mask.contains(severity)) {
            self.deliver(sub, severity, message);
        }
    }

    fn deliver(&self, sub: &Subscription, severity: Severity, message: &str) {
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| sub.stream.write(message, severity)));
        let reason = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(err)) => err.to_string(),
            Err(payload) => panic_reason(payload.as_ref()),
        };
        self.delivery_failures.fetch_add(1, Ordering::Relaxed);
        report_failure(sub.stream.name(), severity, &reason);
    }

    /// Attaches `stream` for the severities in `mask`.
    ///
    /// An empty mask means every severity. If the stream is already attached
    /// its mask becomes the union of the old and new masks and it keeps its
    /// position in the dispatch order.
    pub fn attach_stream(&self, stream: Arc<dyn LogStream>, mask: SeverityMask) {
        let mask = mask.normalized();
        let name = stream.name().to_string();
        let effective = self.update(|subs| {
            match subs.iter_mut().find(|sub| same_stream(&sub.stream, &stream)) {
                Some(sub) => {
                    sub.mask |= mask;
                    sub.mask
                }
                None => {
                    subs.push(Subscription { stream, mask });
                    mask
                }
            }
        });
        tracing::debug!(stream = %name, mask = %effective, "attached log stream");
    }

    /// Attaches `stream` with an externally supplied integer mask (`0` = all).
    pub fn attach_stream_raw(
        &self,
        stream: Arc<dyn LogStream>,
        bits: u32,
    ) -> Result<(), LogError> {
        let mask = SeverityMask::from_raw(bits)?;
        self.attach_stream(stream, mask);
        Ok(())
    }

    /// Removes the severities in `mask` from `stream`'s subscription.
    ///
    /// An empty mask removes the stream entirely, as does clearing its last
    /// severity. Detaching a stream that is not attached is a no-op.
    pub fn detach_stream(&self, stream: &Arc<dyn LogStream>, mask: SeverityMask) {
        let mask = mask.normalized();
        let mut registry = self.registry.write();
        let Some(index) = registry
            .iter()
            .position(|sub| same_stream(&sub.stream, stream))
        else {
            return;
        };

        let mut subs = registry.to_vec();
        let remaining = subs[index].mask - mask;
        if remaining.is_empty() {
            subs.remove(index);
        } else {
            subs[index].mask = remaining;
        }
        *registry = Arc::from(subs);
        drop(registry);

        tracing::debug!(stream = %stream.name(), mask = %remaining, "detached log stream");
    }

    /// Detaches `stream` using an externally supplied integer mask (`0` = all).
    pub fn detach_stream_raw(
        &self,
        stream: &Arc<dyn LogStream>,
        bits: u32,
    ) -> Result<(), LogError> {
        let mask = SeverityMask::from_raw(bits)?;
        self.detach_stream(stream, mask);
        Ok(())
    }

    /// Attaches `stream` and returns a guard that detaches it again on drop.
    pub fn attach_scoped(
        self: &Arc<Self>,
        stream: Arc<dyn LogStream>,
        mask: SeverityMask,
    ) -> StreamGuard {
        let mask = mask.normalized();
        self.attach_stream(Arc::clone(&stream), mask);
        StreamGuard::new(Arc::clone(self), stream, mask)
    }

    /// Removes every stream. Used when the host tears the logger down.
    pub fn detach_all(&self) {
        *self.registry.write() = Arc::from(Vec::new());
    }

    /// Returns the mask `stream` is currently attached with, if any.
    pub fn mask_of(&self, stream: &Arc<dyn LogStream>) -> Option<SeverityMask> {
        self.registry
            .read()
            .iter()
            .find(|sub| same_stream(&sub.stream, stream))
            .map(|sub| sub.mask)
    }

    /// Returns `true` if `stream` is attached for at least one severity.
    pub fn is_attached(&self, stream: &Arc<dyn LogStream>) -> bool {
        self.mask_of(stream).is_some()
    }

    /// Returns the number of attached streams.
    pub fn stream_count(&self) -> usize {
        self.registry.read().len()
    }

    /// Returns how many deliveries have failed since the bus was created.
    pub fn delivery_failures(&self) -> usize {
        self.delivery_failures.load(Ordering::Relaxed)
    }

    fn update<R>(&self, f: impl FnOnce(&mut Vec<Subscription>) -> R) -> R {
        let mut registry = self.registry.write();
        let mut subs = registry.to_vec();
        let result = f(&mut subs);
        *registry = Arc::from(subs);
        result
    }
}

impl Default for DiagnosticBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DiagnosticBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticBus")
            .field("streams", &self.stream_count())
            .field("verbosity", &self.verbosity())
            .field("delivery_failures", &self.delivery_failures())
            .finish()
    }
}

impl Logger for DiagnosticBus {
    fn log(&self, severity: Severity, message: &str) {
        self.emit(severity, message);
    }

    fn attach_stream(&self, stream: Arc<dyn LogStream>, mask: SeverityMask) {
        DiagnosticBus::attach_stream(self, stream, mask);
    }

    fn detach_stream(&self, stream: &Arc<dyn LogStream>, mask: SeverityMask) {
        DiagnosticBus::detach_stream(self, stream, mask);
    }
}

/// Reports a failed delivery through `tracing`.
///
/// If a tracing subscriber routes events back into a bus whose stream fails
/// again, the nested report is dropped instead of recursing.
fn report_failure(stream: &str, severity: Severity, reason: &str) {
    REPORTING_FAILURE.with(|reporting| {
        if reporting.replace(true) {
            return;
        }
        let _scope = ReportingScope(reporting);
        tracing::warn!(stream, %severity, reason, "log stream failed to deliver message");
    });
}

/// Clears the re-entrancy flag even if a subscriber panics mid-report.
struct ReportingScope<'a>(&'a Cell<bool>);

impl Drop for ReportingScope<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("stream panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("stream panicked: {s}")
    } else {
        "stream panicked (unknown payload)".to_string()
    }
}
