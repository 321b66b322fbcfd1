//! Built-in streams: console, file and `tracing` forwarding.

use crate::severity::Severity;
use crate::stream::{LogStream, StreamError};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_THREAD_NUMBER: AtomicUsize = AtomicUsize::new(1);

thread_local! {
    static THREAD_NUMBER: usize = NEXT_THREAD_NUMBER.fetch_add(1, Ordering::Relaxed);
}

/// Renders a message into one output line.
///
/// Lines look like `Warn,  T3: texture 'wood.png' not found`: a severity tag
/// padded to a common width, an optional thread tag, then the message.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LineFormat {
    /// Whether to include the id of the emitting thread.
    pub thread_tag: bool,
}

impl LineFormat {
    /// Creates a format with the thread tag switched on or off.
    pub fn new(thread_tag: bool) -> Self {
        Self { thread_tag }
    }

    /// Renders `message` without a trailing newline.
    pub fn render(&self, message: &str, severity: Severity) -> String {
        let prefix = match severity {
            Severity::Debugging => "Debug, ",
            Severity::Info => "Info,  ",
            Severity::Warn => "Warn,  ",
            Severity::Error => "Error, ",
        };
        if self.thread_tag {
            format!("{prefix}T{}: {message}", current_thread_number())
        } else {
            format!("{prefix}{message}")
        }
    }
}

impl Default for LineFormat {
    fn default() -> Self {
        Self::new(true)
    }
}

/// A small per-process number for the calling thread, assigned on first use.
fn current_thread_number() -> usize {
    THREAD_NUMBER.with(|n| *n)
}

/// Writes formatted lines to standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutStream {
    format: LineFormat,
}

impl StdoutStream {
    /// Creates a stdout stream with the given line format.
    pub fn new(format: LineFormat) -> Self {
        Self { format }
    }
}

impl LogStream for StdoutStream {
    fn write(&self, message: &str, severity: Severity) -> Result<(), StreamError> {
        let line = self.format.render(message, severity);
        writeln!(io::stdout().lock(), "{line}")?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}

/// Writes formatted lines to standard error.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrStream {
    format: LineFormat,
}

impl StderrStream {
    /// Creates a stderr stream with the given line format.
    pub fn new(format: LineFormat) -> Self {
        Self { format }
    }
}

impl LogStream for StderrStream {
    fn write(&self, message: &str, severity: Severity) -> Result<(), StreamError> {
        let line = self.format.render(message, severity);
        writeln!(io::stderr().lock(), "{line}")?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stderr"
    }
}

/// Writes formatted lines to a log file, flushing after every message.
///
/// The file is created (or truncated) when the stream is opened.
#[derive(Debug)]
pub struct FileStream {
    path: PathBuf,
    name: String,
    format: LineFormat,
    writer: Mutex<BufWriter<File>>,
}

impl FileStream {
    /// Creates or truncates the file at `path`.
    pub fn create(path: impl AsRef<Path>, format: LineFormat) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self {
            name: format!("file:{}", path.display()),
            path,
            format,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// The path being written to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogStream for FileStream {
    fn write(&self, message: &str, severity: Severity) -> Result<(), StreamError> {
        let line = self.format.render(message, severity);
        let mut writer = self.writer.lock();
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Re-emits every message as a `tracing` event at the matching level.
///
/// Lets a host that already runs a `tracing` subscriber collect importer
/// output alongside its own. Events use the `aiport` target.
///
/// Do not attach this stream to a bus that the host's subscriber feeds
/// `tracing` events back into. Every message would then travel through the
/// bus again without end. At minimum the subscriber must skip events whose
/// target is `aiport`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingStream;

impl LogStream for TracingStream {
    fn write(&self, message: &str, severity: Severity) -> Result<(), StreamError> {
        match severity {
            Severity::Debugging => tracing::debug!(target: "aiport", "{message}"),
            Severity::Info => tracing::info!(target: "aiport", "{message}"),
            Severity::Warn => tracing::warn!(target: "aiport", "{message}"),
            Severity::Error => tracing::error!(target: "aiport", "{message}"),
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "tracing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_without_thread_tag() {
        let format = LineFormat::new(false);
        assert_eq!(format.render("hello", Severity::Debugging), "Debug, hello");
        assert_eq!(format.render("hello", Severity::Info), "Info,  hello");
        assert_eq!(format.render("hello", Severity::Warn), "Warn,  hello");
        assert_eq!(format.render("hello", Severity::Error), "Error, hello");
    }

    #[test]
    fn render_with_thread_tag() {
        let line = LineFormat::default().render("loading scene", Severity::Info);
        assert!(line.starts_with("Info,  T"));
        assert!(line.ends_with(": loading scene"));
        let tag = &line["Info,  T".len()..line.len() - ": loading scene".len()];
        assert!(!tag.is_empty());
        assert!(tag.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn thread_number_is_stable_per_thread() {
        let here = current_thread_number();
        assert_eq!(current_thread_number(), here);
        let there = std::thread::spawn(current_thread_number).join().unwrap();
        assert_ne!(here, there);
        assert!(here >= 1 && there >= 1);
    }

    #[test]
    fn file_stream_writes_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.log");
        let stream = FileStream::create(&path, LineFormat::new(false)).unwrap();
        stream.write("opened mesh.obj", Severity::Info).unwrap();
        stream.write("normals missing", Severity::Warn).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Info,  opened mesh.obj\nWarn,  normals missing\n");
        assert_eq!(stream.path(), path.as_path());
        assert!(stream.name().ends_with("import.log"));
    }

    #[test]
    fn file_stream_create_fails_for_missing_dir() {
        let err =
            FileStream::create("/nonexistent/dir/import.log", LineFormat::default()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn console_and_tracing_streams_accept_messages() {
        assert!(StdoutStream::default().write("to stdout", Severity::Info).is_ok());
        assert!(StderrStream::default().write("to stderr", Severity::Error).is_ok());
        assert!(TracingStream.write("to tracing", Severity::Warn).is_ok());
        assert_eq!(TracingStream.name(), "tracing");
    }
}
