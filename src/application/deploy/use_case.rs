//! Deploy Use Case
//!
//! Orchestrates one reconciliation run:
//! 1. Acquire a backend session
//! 2. Observe: fingerprint the local tree and load the previous manifest
//! 3. Plan the uploads and deletions
//! 4. Apply: deletions first, then uploads in path order
//! 5. Commit the new manifest
//!
//! A dry run stops after step 3. An empty local tree never deletes what the
//! manifest records unless `allow_empty` is set. Planning lives in the domain `Planner`;
//! this use case is pure orchestration.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::entities::StateMapping;
use crate::domain::ports::{
    BackendConnector, DeployEvent, DeployEventSink, ManifestLoad, ManifestRepository,
    NoopEventSink, RemoteBackend,
};
use crate::domain::services::{Planner, ProgressThrottle, SyncPlan};
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::fs::{local_path, Fingerprinter};

use super::options::DeployOptions;
use super::result::DeployReport;

/// Deploy use case - reconciles a remote target with a local build tree
///
/// Parameterized by its ports so tests can substitute in-memory backends.
pub struct DeployUseCase<C, M>
where
    C: BackendConnector,
    M: ManifestRepository,
{
    connector: C,
    manifest_repo: M,
    fingerprinter: Fingerprinter,
}

impl<C, M> DeployUseCase<C, M>
where
    C: BackendConnector,
    M: ManifestRepository,
{
    pub fn new(connector: C, manifest_repo: M) -> Self {
        let fingerprinter = Fingerprinter::new().excluding(manifest_repo.path());
        Self {
            connector,
            manifest_repo,
            fingerprinter,
        }
    }

    /// Execute the deploy use case
    pub fn execute(&self, options: &DeployOptions) -> DeployResult<DeployReport> {
        self.execute_with_events(options, Arc::new(NoopEventSink))
    }

    /// Execute the deploy use case with event reporting
    pub fn execute_with_events(
        &self,
        options: &DeployOptions,
        event_sink: Arc<dyn DeployEventSink>,
    ) -> DeployResult<DeployReport> {
        let target = self.connector.target();
        let mut report = DeployReport::new(self.connector.backend_name(), target.clone());
        report.dry_run = options.dry_run;

        event_sink.on_event(DeployEvent::Started {
            source: options.source.clone(),
            destination: target.clone(),
            backend: report.backend.clone(),
            force_full: options.force_full,
            dry_run: options.dry_run,
        });

        // Acquire
        let backend = self
            .connector
            .connect()
            .map_err(|source| DeployError::Connection {
                target: target.clone(),
                source,
            })?;
        event_sink.on_event(DeployEvent::Connected {
            backend: backend.name().to_string(),
        });

        // Observe
        let local = self.fingerprinter.scan(&options.source)?;
        report.scanned = local.len();
        event_sink.on_event(DeployEvent::Scanned {
            file_count: local.len(),
            total_bytes: local.total_bytes(),
        });

        let ManifestLoad {
            state: manifest,
            status,
        } = self
            .manifest_repo
            .load(backend.as_ref())
            .map_err(|source| DeployError::Connection {
                target: target.clone(),
                source,
            })?;
        event_sink.on_event(DeployEvent::ManifestLoaded {
            status: status.clone(),
            entries: manifest.len(),
        });
        report.manifest_status = status;

        // Plan
        let plan = Planner::plan(&local, &manifest, options.force_full);
        report.planned_uploads = plan.uploads.keys().map(|p| p.to_string()).collect();
        report.planned_deletions = plan.deletions.iter().map(|p| p.to_string()).collect();
        report.upload_bytes = plan.upload_bytes(&local);
        report.unchanged = plan.unchanged;
        event_sink.on_event(DeployEvent::Planned {
            uploads: plan.upload_count(),
            deletions: plan.deletion_count(),
            unchanged: plan.unchanged,
            upload_bytes: report.upload_bytes,
        });

        if options.dry_run {
            Self::emit_completed(&event_sink, &report);
            return Ok(report);
        }

        if local.is_empty() && !manifest.is_empty() && !options.allow_empty {
            return Err(DeployError::EmptySource {
                path: options.source.clone(),
                recorded: manifest.len(),
            });
        }

        // Apply
        backend
            .ensure_directory("")
            .map_err(|source| DeployError::Directory {
                path: target.clone(),
                source,
            })?;
        self.apply_deletions(backend.as_ref(), &plan, &event_sink, &mut report)?;
        self.apply_uploads(
            backend.as_ref(),
            &plan,
            &local,
            options,
            &event_sink,
            &mut report,
        )?;

        // Commit
        self.manifest_repo
            .save(backend.as_ref(), &local)
            .map_err(|source| DeployError::ManifestWrite {
                path: self.manifest_repo.path().to_string(),
                source,
            })?;
        report.manifest_committed = true;
        event_sink.on_event(DeployEvent::ManifestCommitted {
            entries: local.len(),
        });

        Self::emit_completed(&event_sink, &report);
        Ok(report)
    }

    fn apply_deletions(
        &self,
        backend: &dyn RemoteBackend,
        plan: &SyncPlan,
        event_sink: &Arc<dyn DeployEventSink>,
        report: &mut DeployReport,
    ) -> DeployResult<()> {
        if plan.deletions.is_empty() {
            return Ok(());
        }

        let paths: Vec<String> = plan.deletions.iter().map(|p| p.to_string()).collect();
        let outcome = backend.delete_many(&paths).map_err(DeployError::Deletion)?;

        if event_sink.wants_detailed_events() {
            for path in &outcome.deleted {
                event_sink.on_event(DeployEvent::Deleted { path: path.clone() });
            }
        }
        for (path, error) in &outcome.skipped {
            event_sink.on_event(DeployEvent::DeleteSkipped {
                path: path.clone(),
                error: error.clone(),
            });
        }

        report.deleted = outcome.deleted;
        report.skipped_deletions = outcome.skipped;
        Ok(())
    }

    fn apply_uploads(
        &self,
        backend: &dyn RemoteBackend,
        plan: &SyncPlan,
        local: &StateMapping,
        options: &DeployOptions,
        event_sink: &Arc<dyn DeployEventSink>,
        report: &mut DeployReport,
    ) -> DeployResult<()> {
        let total = plan.upload_count();
        let detailed = event_sink.wants_detailed_events();
        // The base directory was created at the start of Apply.
        let mut known_dirs: HashSet<String> = HashSet::from([String::new()]);

        for (index, (path, reason)) in plan.uploads().enumerate() {
            let rel = path.to_string();
            event_sink.on_event(DeployEvent::UploadStarted {
                index,
                total,
                path: rel.clone(),
                reason,
                size: local.get(path).map(|fp| fp.size()).unwrap_or(0),
            });

            if let Some(parent) = path.parent() {
                if !known_dirs.contains(parent) {
                    backend
                        .ensure_directory(parent)
                        .map_err(|source| DeployError::Upload {
                            path: rel.clone(),
                            source,
                        })?;
                    remember_ancestors(&mut known_dirs, parent);
                }
            }

            let mut throttle = ProgressThrottle::new(options.progress_interval);
            let mut on_progress = |bytes_done: u64, bytes_total: u64| {
                if throttle.should_report(bytes_done, bytes_total) {
                    event_sink.on_event(DeployEvent::UploadProgress {
                        path: rel.clone(),
                        bytes_done,
                        bytes_total,
                    });
                }
            };
            backend
                .upload(
                    &local_path(&options.source, path),
                    path.as_str(),
                    &mut on_progress,
                )
                .map_err(|source| DeployError::Upload {
                    path: rel.clone(),
                    source,
                })?;

            if detailed {
                event_sink.on_event(DeployEvent::Uploaded {
                    index,
                    path: rel.clone(),
                });
            }
            report.uploaded.push(rel);
        }
        Ok(())
    }

    fn emit_completed(event_sink: &Arc<dyn DeployEventSink>, report: &DeployReport) {
        event_sink.on_event(DeployEvent::Completed {
            uploaded: report.uploaded.len(),
            deleted: report.deleted.len(),
            skipped_deletions: report.skipped_deletions.len(),
            unchanged: report.unchanged,
            dry_run: report.dry_run,
        });
    }
}

/// Record a directory and every ancestor as existing
fn remember_ancestors(known: &mut HashSet<String>, dir: &str) {
    let mut current = dir;
    loop {
        if !known.insert(current.to_string()) {
            return;
        }
        match current.rsplit_once('/') {
            Some((parent, _)) => current = parent,
            None => return,
        }
    }
}
