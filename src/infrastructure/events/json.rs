//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Emit a terminal `error` event for a failed command
    pub fn error(&self, command: &str, message: &str) {
        self.write_event(serde_json::json!({
            "event": "error",
            "command": command,
            "message": message,
        }));
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

/// JSON object for one event
pub fn event_json(event: &DeployEvent) -> serde_json::Value {
    match event {
        DeployEvent::Started {
            source,
            destination,
            backend,
            force_full,
            dry_run,
        } => serde_json::json!({
            "event": "start",
            "command": "deploy",
            "source": source.display().to_string(),
            "destination": destination,
            "backend": backend,
            "force_full": force_full,
            "dry_run": dry_run,
        }),

        DeployEvent::Connected { backend } => serde_json::json!({
            "event": "connected",
            "command": "deploy",
            "backend": backend,
        }),

        DeployEvent::Scanned {
            file_count,
            total_bytes,
        } => serde_json::json!({
            "event": "scanned",
            "command": "deploy",
            "files": file_count,
            "bytes": total_bytes,
        }),

        DeployEvent::ManifestLoaded { status, entries } => {
            let mut value = serde_json::json!({
                "event": "manifest_loaded",
                "command": "deploy",
                "status": status.label(),
                "entries": entries,
            });
            if let Some(detail) = status.detail() {
                value["detail"] = serde_json::Value::from(detail);
            }
            value
        }

        DeployEvent::Planned {
            uploads,
            deletions,
            unchanged,
            upload_bytes,
        } => serde_json::json!({
            "event": "planned",
            "command": "deploy",
            "uploads": uploads,
            "deletions": deletions,
            "unchanged": unchanged,
            "upload_bytes": upload_bytes,
        }),

        DeployEvent::Deleted { path } => serde_json::json!({
            "event": "item_deleted",
            "command": "deploy",
            "path": path,
        }),

        DeployEvent::DeleteSkipped { path, error } => serde_json::json!({
            "event": "item_delete_skipped",
            "command": "deploy",
            "path": path,
            "error": error,
        }),

        DeployEvent::UploadStarted {
            index,
            total,
            path,
            reason,
            size,
        } => serde_json::json!({
            "event": "item_start",
            "command": "deploy",
            "index": index,
            "total": total,
            "path": path,
            "reason": reason.as_str(),
            "size": size,
        }),

        DeployEvent::UploadProgress {
            path,
            bytes_done,
            bytes_total,
        } => serde_json::json!({
            "event": "item_progress",
            "command": "deploy",
            "path": path,
            "bytes_done": bytes_done,
            "bytes_total": bytes_total,
        }),

        DeployEvent::Uploaded { index, path } => serde_json::json!({
            "event": "item_written",
            "command": "deploy",
            "index": index,
            "path": path,
        }),

        DeployEvent::ManifestCommitted { entries } => serde_json::json!({
            "event": "manifest_committed",
            "command": "deploy",
            "entries": entries,
        }),

        DeployEvent::Completed {
            uploaded,
            deleted,
            skipped_deletions,
            unchanged,
            dry_run,
        } => {
            let status = if *skipped_deletions == 0 {
                "success"
            } else {
                "partial"
            };
            serde_json::json!({
                "event": "complete",
                "command": "deploy",
                "status": status,
                "uploaded": uploaded,
                "deleted": deleted,
                "skipped_deletions": skipped_deletions,
                "unchanged": unchanged,
                "dry_run": dry_run,
            })
        }
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        self.write_event(event_json(&event));
    }

    fn wants_detailed_events(&self) -> bool {
        true // JSON mode wants all events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ManifestStatus;
    use crate::domain::services::UploadReason;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    struct TestWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl TestWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buffer = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    buffer: buffer.clone(),
                },
                buffer,
            )
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn lines(buffer: &Arc<Mutex<Vec<u8>>>) -> Vec<serde_json::Value> {
        String::from_utf8(buffer.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn json_sink_outputs_start_event() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(DeployEvent::Started {
            source: PathBuf::from("build/server"),
            destination: "deploy@host:22:/srv".to_string(),
            backend: "bulk".to_string(),
            force_full: false,
            dry_run: true,
        });

        let events = lines(&buffer);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["event"], "start");
        assert_eq!(events[0]["backend"], "bulk");
        assert_eq!(events[0]["dry_run"], true);
    }

    #[test]
    fn json_sink_writes_one_line_per_event() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(DeployEvent::UploadStarted {
            index: 0,
            total: 2,
            path: "mods/a.jar".to_string(),
            reason: UploadReason::Changed,
            size: 42,
        });
        sink.on_event(DeployEvent::Uploaded {
            index: 0,
            path: "mods/a.jar".to_string(),
        });

        let events = lines(&buffer);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["reason"], "changed");
        assert_eq!(events[1]["event"], "item_written");
    }

    #[test]
    fn json_sink_reports_corrupt_manifest_detail() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(DeployEvent::ManifestLoaded {
            status: ManifestStatus::Corrupt("expected value".to_string()),
            entries: 0,
        });

        let events = lines(&buffer);
        assert_eq!(events[0]["status"], "corrupt");
        assert_eq!(events[0]["detail"], "expected value");
    }

    #[test]
    fn json_sink_outputs_partial_on_skipped_deletions() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(DeployEvent::Completed {
            uploaded: 10,
            deleted: 1,
            skipped_deletions: 2,
            unchanged: 5,
            dry_run: false,
        });

        let events = lines(&buffer);
        assert_eq!(events[0]["status"], "partial");
        assert_eq!(events[0]["uploaded"], 10);
    }

    #[test]
    fn json_sink_error_event() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.error("deploy", "connection refused");

        let events = lines(&buffer);
        assert_eq!(events[0]["event"], "error");
        assert_eq!(events[0]["message"], "connection refused");
    }
}
