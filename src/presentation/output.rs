//! Output Rendering
//!
//! Final summaries for deploy and pack runs. Per-event progress lines come
//! from the event sinks; these render once at the end.

use std::fmt::Write as _;
use std::time::Duration;

use serde_json::{json, Value};

use crate::application::{DeployReport, PackReport};
use crate::ui::format::{format_bytes_compact, format_duration_compact, format_rate};
use crate::ui::icon::Icon;

/// Human-readable deploy summary
pub fn render_deploy_summary(report: &DeployReport, elapsed: Duration, unicode: bool) -> String {
    let mut out = String::new();

    if report.dry_run {
        let _ = writeln!(
            out,
            "{} Dry run for {} ({}): {} to upload ({}), {} to delete, {} unchanged",
            Icon::Deploy.render(unicode),
            report.target,
            report.backend,
            report.planned_uploads.len(),
            format_bytes_compact(report.upload_bytes),
            report.planned_deletions.len(),
            report.unchanged,
        );
        for path in &report.planned_uploads {
            let _ = writeln!(out, "  {} {}", Icon::Upload.render(unicode), path);
        }
        for path in &report.planned_deletions {
            let _ = writeln!(out, "  {} {}", Icon::Trash.render(unicode), path);
        }
        return out;
    }

    if report.is_noop() {
        let _ = writeln!(
            out,
            "{} {} is up to date ({} files)",
            Icon::Success.render(unicode),
            report.target,
            report.unchanged,
        );
        return out;
    }

    let icon = if report.is_clean() {
        Icon::Success
    } else {
        Icon::Warning
    };
    let _ = writeln!(
        out,
        "{} Deployed to {} in {}: {} uploaded ({}, {}), {} deleted, {} unchanged",
        icon.render(unicode),
        report.target,
        format_duration_compact(elapsed),
        report.uploaded.len(),
        format_bytes_compact(report.upload_bytes),
        format_rate(report.upload_bytes, elapsed),
        report.deleted.len(),
        report.unchanged,
    );
    if !report.skipped_deletions.is_empty() {
        let _ = writeln!(
            out,
            "{} {} stale files could not be deleted and are no longer tracked:",
            Icon::Warning.render(unicode),
            report.skipped_deletions.len(),
        );
        for (path, reason) in &report.skipped_deletions {
            let _ = writeln!(out, "  {} {}: {}", Icon::Arrow.render(unicode), path, reason);
        }
    }
    out
}

/// Human-readable pack summary
pub fn render_pack_summary(report: &PackReport, unicode: bool) -> String {
    let mut out = String::new();
    for warning in &report.warnings {
        let _ = writeln!(out, "{} {}", Icon::Warning.render(unicode), warning);
    }
    for build in &report.builds {
        let mut line = format!(
            "{} {} pack: {} files",
            Icon::Pack.render(unicode),
            build.mode,
            build.copied,
        );
        if build.overlaid > 0 {
            let _ = write!(line, " + {} from overlay", build.overlaid);
        }
        let _ = writeln!(out, "{} -> {}", line, build.output.display());
    }
    out
}

/// Single JSON object describing a pack run
pub fn pack_json(report: &PackReport) -> Value {
    json!({
        "event": "pack_complete",
        "builds": report.builds.iter().map(|b| json!({
            "mode": b.mode.as_str(),
            "output": b.output.display().to_string(),
            "cleaned": b.cleaned,
            "copied": b.copied,
            "overlaid": b.overlaid,
            "patterns": b.patterns,
        })).collect::<Vec<_>>(),
        "warnings": report.warnings,
    })
}
