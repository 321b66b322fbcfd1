//! Construction of a ready-to-use bus from a [`LogConfig`].

use crate::error::ConfigError;
use crate::types::{LogConfig, StreamConfig, StreamKind};
use aiport_log::{
    DiagnosticBus, FileStream, LineFormat, LogStream, StderrStream, StdoutStream, TracingStream,
};
use std::sync::Arc;

/// Creates a bus and attaches every configured stream in declaration order.
///
/// File streams are opened here; failing to create a log file aborts the
/// build with [`ConfigError::IoError`] and no bus is returned.
pub fn build_bus(config: &LogConfig) -> Result<Arc<DiagnosticBus>, ConfigError> {
    let bus = Arc::new(DiagnosticBus::with_verbosity(config.logger.verbosity));
    let format = LineFormat::new(config.logger.thread_tag);
    for stream_config in &config.streams {
        let stream = open_stream(stream_config, format)?;
        bus.attach_stream(stream, stream_config.mask());
    }
    tracing::debug!(streams = bus.stream_count(), "built diagnostic bus");
    Ok(bus)
}

fn open_stream(
    config: &StreamConfig,
    format: LineFormat,
) -> Result<Arc<dyn LogStream>, ConfigError> {
    let stream: Arc<dyn LogStream> = match config.kind {
        StreamKind::Stdout => Arc::new(StdoutStream::new(format)),
        StreamKind::Stderr => Arc::new(StderrStream::new(format)),
        StreamKind::Tracing => Arc::new(TracingStream),
        StreamKind::File => {
            let path = config
                .path
                .as_deref()
                .ok_or_else(|| ConfigError::MissingField("path".to_string()))?;
            Arc::new(FileStream::create(path, format)?)
        }
    };
    Ok(stream)
}
