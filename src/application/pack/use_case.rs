//! Pack Use Case
//!
//! Builds the client and/or server tree of a modpack project:
//! 1. Clean and recreate the output directory
//! 2. Copy the project tree, minus operational files and excluded patterns
//! 3. Server only: overlay `server_pack/` on top

use std::fs;
use std::path::{Path, PathBuf};

use ignore::{DirEntry, WalkBuilder};

use crate::domain::value_objects::IgnorePatterns;
use crate::error::{DeployError, DeployResult};

use super::options::{
    PackMode, PackOptions, CLIENT_FILES_FILE, DEFAULT_BUILD_DIR, PACK_IGNORE_FILE,
    SERVER_PACK_DIR,
};
use super::result::{PackBuild, PackReport};

/// Names never copied into a pack, at any depth
const ALWAYS_EXCLUDED: &[&str] = &[
    ".git",
    ".github",
    ".idea",
    DEFAULT_BUILD_DIR,
    "__pycache__",
    CLIENT_FILES_FILE,
    PACK_IGNORE_FILE,
    SERVER_PACK_DIR,
    "packdeploy.toml",
];

/// Pack use case - copies a project into deployable trees
#[derive(Debug, Default)]
pub struct PackUseCase;

impl PackUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Build the requested mode, or both modes in client, server order
    pub fn execute(&self, options: &PackOptions) -> DeployResult<PackReport> {
        let root = fs::canonicalize(&options.root).map_err(|_| DeployError::SourceMissing {
            path: options.root.clone(),
        })?;
        let mut report = PackReport::default();

        match options.mode {
            Some(mode) => {
                let output = match &options.output {
                    Some(out) if out.is_absolute() => out.clone(),
                    Some(out) => root.join(out),
                    None => default_output(&root, mode),
                };
                report.builds.push(self.build(&root, mode, &output, &mut report.warnings)?);
            }
            None => {
                if options.output.is_some() {
                    report
                        .warnings
                        .push("--output is ignored when building both modes".to_string());
                }
                for mode in PackMode::ALL {
                    let output = default_output(&root, mode);
                    let build = self.build(&root, mode, &output, &mut report.warnings)?;
                    report.builds.push(build);
                }
            }
        }

        Ok(report)
    }

    fn build(
        &self,
        root: &Path,
        mode: PackMode,
        output: &Path,
        warnings: &mut Vec<String>,
    ) -> DeployResult<PackBuild> {
        check_output(root, output)?;

        let cleaned = output.exists();
        if cleaned {
            fs::remove_dir_all(output)?;
        }
        fs::create_dir_all(output)?;
        let output = fs::canonicalize(output)?;

        let patterns = IgnorePatterns::load(root, mode.pattern_files())?;
        let pattern_count = patterns.pattern_count();
        let copied = copy_tree(root, &output, patterns)?;

        let overlaid = if mode == PackMode::Server {
            let overlay = root.join(SERVER_PACK_DIR);
            if overlay.is_dir() {
                merge_tree(&overlay, &output)?
            } else {
                warnings.push(format!(
                    "{} not found; server pack has no overlay",
                    overlay.display()
                ));
                0
            }
        } else {
            0
        };

        Ok(PackBuild {
            mode,
            output,
            cleaned,
            copied,
            overlaid,
            patterns: pattern_count,
        })
    }
}

fn default_output(root: &Path, mode: PackMode) -> PathBuf {
    root.join(DEFAULT_BUILD_DIR).join(mode.as_str())
}

/// Refuse outputs whose cleanup would delete the project itself
fn check_output(root: &Path, output: &Path) -> DeployResult<()> {
    let resolved = fs::canonicalize(output).unwrap_or_else(|_| output.to_path_buf());
    if root.starts_with(&resolved) {
        return Err(DeployError::PackOutput {
            path: output.to_path_buf(),
            reason: "it contains the project root".to_string(),
        });
    }
    Ok(())
}

/// Copy `root` into `output`, returning the number of files copied
fn copy_tree(root: &Path, output: &Path, patterns: IgnorePatterns) -> DeployResult<usize> {
    let walk_root = root.to_path_buf();
    let skip = output.to_path_buf();

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| keep_entry(entry, &walk_root, &skip, &patterns))
        .build();

    let mut copied = 0;
    for entry in walker {
        let entry = entry.map_err(walk_error)?;
        if entry.depth() == 0 {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let dest = output.join(rel);

        if entry.file_type().is_some_and(|t| t.is_dir()) {
            fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn keep_entry(entry: &DirEntry, root: &Path, output: &Path, patterns: &IgnorePatterns) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    if entry.path() == output {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    if ALWAYS_EXCLUDED.contains(&name.as_ref()) {
        return false;
    }
    match entry.path().strip_prefix(root) {
        Ok(rel) => {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !patterns.is_ignored(rel, is_dir)
        }
        Err(_) => false,
    }
}

/// Copy every file of `overlay` into `output`, overwriting
fn merge_tree(overlay: &Path, output: &Path) -> DeployResult<usize> {
    let walker = WalkBuilder::new(overlay)
        .standard_filters(false)
        .follow_links(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut merged = 0;
    for entry in walker {
        let entry = entry.map_err(walk_error)?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(overlay)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let dest = output.join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dest)?;
        merged += 1;
    }
    Ok(merged)
}

fn walk_error(err: ignore::Error) -> DeployError {
    match err.into_io_error() {
        Some(io) => DeployError::Io(io),
        None => DeployError::Io(std::io::Error::other("directory walk failed")),
    }
}
