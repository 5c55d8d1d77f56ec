//! Console Event Sink
//!
//! Human-readable progress lines on stderr.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{DeployEvent, DeployEventSink, ManifestStatus};
use crate::ui::format::{format_bytes_compact, format_progress};
use crate::ui::icon::Icon;

/// Event sink that prints progress for an operator watching the run
pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    unicode: bool,
    verbose: bool,
}

impl ConsoleEventSink {
    pub fn stderr(unicode: bool, verbose: bool) -> Self {
        Self::with_writer(io::stderr(), unicode, verbose)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, unicode: bool, verbose: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            unicode,
            verbose,
        }
    }

    fn icon(&self, icon: Icon) -> &'static str {
        icon.render(self.unicode)
    }

    /// Format one event; `None` when the event is not shown
    fn render(&self, event: &DeployEvent) -> Option<String> {
        match event {
            DeployEvent::Started {
                source,
                destination,
                backend,
                force_full,
                dry_run,
            } => {
                let mut line = format!(
                    "{} Deploying {} to {} ({})",
                    self.icon(Icon::Deploy),
                    source.display(),
                    destination,
                    backend
                );
                if *force_full {
                    line.push_str(" [force full]");
                }
                if *dry_run {
                    line.push_str(" [dry run]");
                }
                Some(line)
            }

            DeployEvent::Connected { backend } => {
                Some(format!("{} Connected via {}", self.icon(Icon::Remote), backend))
            }

            DeployEvent::Scanned {
                file_count,
                total_bytes,
            } => Some(format!(
                "{} Scanned {} local files ({})",
                self.icon(Icon::Success),
                file_count,
                format_bytes_compact(*total_bytes)
            )),

            DeployEvent::ManifestLoaded { status, entries } => Some(match status {
                ManifestStatus::Loaded => format!(
                    "{} Previous manifest: {} entries",
                    self.icon(Icon::Success),
                    entries
                ),
                ManifestStatus::Missing => format!(
                    "{} No previous manifest; every file will be uploaded",
                    self.icon(Icon::Warning)
                ),
                other => format!(
                    "{} Previous manifest {}; treating target as empty",
                    self.icon(Icon::Warning),
                    other
                ),
            }),

            DeployEvent::Planned {
                uploads,
                deletions,
                unchanged,
                upload_bytes,
            } => Some(format!(
                "{} Plan: {} to upload ({}), {} to delete, {} unchanged",
                self.icon(Icon::Arrow),
                uploads,
                format_bytes_compact(*upload_bytes),
                deletions,
                unchanged
            )),

            DeployEvent::Deleted { path } => self
                .verbose
                .then(|| format!("  {} {}", self.icon(Icon::Trash), path)),

            DeployEvent::DeleteSkipped { path, error } => Some(format!(
                "  {} Could not delete {}: {}",
                self.icon(Icon::Warning),
                path,
                error
            )),

            DeployEvent::UploadStarted {
                index,
                total,
                path,
                reason,
                size,
            } => Some(format!(
                "  {} [{}/{}] {} ({}, {})",
                self.icon(Icon::Upload),
                index + 1,
                total,
                path,
                reason,
                format_bytes_compact(*size)
            )),

            DeployEvent::UploadProgress {
                path,
                bytes_done,
                bytes_total,
            } => (bytes_done < bytes_total).then(|| {
                format!(
                    "    {} {} {}",
                    self.icon(Icon::Progress),
                    path,
                    format_progress(*bytes_done, *bytes_total)
                )
            }),

            DeployEvent::Uploaded { path, .. } => self
                .verbose
                .then(|| format!("    {} {}", self.icon(Icon::Success), path)),

            DeployEvent::ManifestCommitted { entries } => Some(format!(
                "{} Manifest updated ({} entries)",
                self.icon(Icon::Success),
                entries
            )),

            // The final summary is rendered by the command itself.
            DeployEvent::Completed { .. } => None,
        }
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        let Some(line) = self.render(&event) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.verbose
    }
}
