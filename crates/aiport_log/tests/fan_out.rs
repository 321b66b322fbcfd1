//! End-to-end behavior of the bus as seen by importers and stream owners.

use aiport_log::{
    DiagnosticBus, FileStream, LineFormat, LogStream, Logger, NullLogger, Severity, SeverityMask,
    StreamError,
};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Default)]
struct Recorder {
    entries: Mutex<Vec<(String, Severity)>>,
}

impl Recorder {
    fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(m, _)| m.clone())
            .collect()
    }
}

impl LogStream for Recorder {
    fn write(&self, message: &str, severity: Severity) -> Result<(), StreamError> {
        self.entries
            .lock()
            .unwrap()
            .push((message.to_string(), severity));
        Ok(())
    }
}

/// Stands in for a format loader that only knows the `Logger` contract.
fn import_mesh(logger: &dyn Logger, name: &str, faces: usize) {
    logger.debug(&format!("reading {name}"));
    logger.info(&format!("{name}: {faces} faces"));
    if faces == 0 {
        logger.warn(&format!("{name}: mesh is empty"));
    }
}

#[test]
fn importer_reports_through_shared_bus() {
    let bus = Arc::new(DiagnosticBus::new());
    let everything = Arc::new(Recorder::default());
    let problems = Arc::new(Recorder::default());
    bus.attach_stream(everything.clone(), SeverityMask::EMPTY);
    bus.attach_stream(problems.clone(), Severity::Warn | Severity::Error);

    import_mesh(bus.as_ref(), "cube.obj", 12);
    import_mesh(bus.as_ref(), "empty.obj", 0);

    assert_eq!(everything.messages().len(), 5);
    assert_eq!(problems.messages(), vec!["empty.obj: mesh is empty"]);
}

#[test]
fn null_logger_satisfies_importers() {
    import_mesh(&NullLogger, "cube.obj", 0);
}

#[test]
fn scoped_file_stream() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("AssimpLog.txt");
    let bus = Arc::new(DiagnosticBus::new());

    {
        let file = FileStream::create(&path, LineFormat::new(false)).unwrap();
        let _guard = bus.attach_scoped(Arc::new(file), Severity::Error.into());
        bus.info("ignored by the file");
        bus.error("unsupported FBX version");
    }
    bus.error("after the guard");

    assert_eq!(bus.stream_count(), 0);
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "Error, unsupported FBX version\n");
}

#[test]
fn concurrent_importers_and_registrants() {
    let bus = Arc::new(DiagnosticBus::new());
    let shared = Arc::new(Recorder::default());
    bus.attach_stream(shared.clone(), Severity::Info.into());

    let mut handles = Vec::new();
    for worker in 0..4 {
        let bus = Arc::clone(&bus);
        handles.push(thread::spawn(move || {
            let own: Arc<dyn LogStream> = Arc::new(Recorder::default());
            for i in 0..50 {
                let guard = bus.attach_scoped(Arc::clone(&own), SeverityMask::ALL);
                bus.info(&format!("worker {worker} step {i}"));
                drop(guard);
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    // Only the long-lived stream remains, and it saw every message.
    assert_eq!(bus.stream_count(), 1);
    assert_eq!(shared.messages().len(), 200);
    assert_eq!(bus.delivery_failures(), 0);
}
