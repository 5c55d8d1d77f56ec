//! Ignore patterns value object
//!
//! Handles loading and matching `.packignore` / `.client_files` patterns
//! using gitignore semantics.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum file size for a pattern file (64KB)
const MAX_FILE_SIZE: u64 = 65536;

/// Maximum number of patterns allowed across all loaded files
const MAX_PATTERNS: usize = 1000;

/// Patterns loaded from one or more pattern files at the project root.
///
/// Uses the `ignore` crate for gitignore-compatible pattern matching.
/// Later files take precedence, so a `!negation` in `.client_files` can
/// re-include something `.packignore` excluded.
#[derive(Debug)]
pub struct IgnorePatterns {
    matcher: Gitignore,
    pattern_count: usize,
}

impl Default for IgnorePatterns {
    fn default() -> Self {
        Self::empty()
    }
}

impl IgnorePatterns {
    /// Create an empty pattern set (matches nothing).
    pub fn empty() -> Self {
        Self {
            matcher: Gitignore::empty(),
            pattern_count: 0,
        }
    }

    /// Load patterns from the named files under `root`, in order.
    ///
    /// Missing files are skipped.
    pub fn load(root: &Path, file_names: &[&str]) -> Result<Self, IgnoreError> {
        let mut builder = GitignoreBuilder::new(root);
        let mut pattern_count = 0;

        for name in file_names {
            let path = root.join(name);
            if !path.is_file() {
                continue;
            }

            let metadata = fs::metadata(&path).map_err(IgnoreError::Io)?;
            if metadata.len() > MAX_FILE_SIZE {
                return Err(IgnoreError::FileTooLarge {
                    path,
                    size: metadata.len(),
                    limit: MAX_FILE_SIZE,
                });
            }

            let content = fs::read_to_string(&path).map_err(IgnoreError::Io)?;
            pattern_count += add_lines(&mut builder, &path, &content, pattern_count)?;
        }

        let matcher = builder
            .build()
            .map_err(|e| IgnoreError::BuildFailed(e.to_string()))?;

        Ok(Self {
            matcher,
            pattern_count,
        })
    }

    /// Parse patterns from string content (for testing).
    pub fn from_content(
        root: &Path,
        source_path: &Path,
        content: &str,
    ) -> Result<Self, IgnoreError> {
        let mut builder = GitignoreBuilder::new(root);
        let pattern_count = add_lines(&mut builder, source_path, content, 0)?;
        let matcher = builder
            .build()
            .map_err(|e| IgnoreError::BuildFailed(e.to_string()))?;
        Ok(Self {
            matcher,
            pattern_count,
        })
    }

    /// Check if a path (relative to the root) should be ignored.
    ///
    /// `is_dir` should be true if the path is a directory.
    pub fn is_ignored(&self, rel_path: &Path, is_dir: bool) -> bool {
        if self.pattern_count == 0 {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(rel_path, is_dir)
            .is_ignore()
    }

    /// Get the number of patterns loaded.
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Check if this is an empty pattern set.
    pub fn is_empty(&self) -> bool {
        self.pattern_count == 0
    }
}

fn add_lines(
    builder: &mut GitignoreBuilder,
    source_path: &Path,
    content: &str,
    already_loaded: usize,
) -> Result<usize, IgnoreError> {
    let mut added = 0;

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        added += 1;
        if already_loaded + added > MAX_PATTERNS {
            return Err(IgnoreError::TooManyPatterns {
                path: source_path.to_path_buf(),
                count: already_loaded + added,
                limit: MAX_PATTERNS,
            });
        }

        if let Err(e) = builder.add_line(Some(source_path.to_path_buf()), trimmed) {
            return Err(IgnoreError::InvalidPattern {
                path: source_path.to_path_buf(),
                line: line_num + 1,
                pattern: line.to_string(),
                message: e.to_string(),
            });
        }
    }

    Ok(added)
}

/// Errors that can occur when loading ignore patterns.
#[derive(Debug, thiserror::Error)]
pub enum IgnoreError {
    /// A pattern file exceeds the size limit.
    #[error("pattern file exceeds {}KB limit ({size} bytes): {}", limit / 1024, path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },
    /// Too many patterns in total.
    #[error("{count} ignore patterns exceed the {limit} limit: {}", path.display())]
    TooManyPatterns {
        path: PathBuf,
        count: usize,
        limit: usize,
    },
    /// A pattern has invalid syntax.
    #[error("invalid pattern at {}:{line}: '{pattern}' - {message}", path.display())]
    InvalidPattern {
        path: PathBuf,
        line: usize,
        pattern: String,
        message: String,
    },
    /// Failed to build the gitignore matcher.
    #[error("failed to build ignore matcher: {0}")]
    BuildFailed(String),
    /// IO error reading a pattern file.
    #[error("IO error reading pattern file: {0}")]
    Io(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_patterns_match_nothing() {
        let patterns = IgnorePatterns::empty();
        assert!(!patterns.is_ignored(Path::new("anything.jar"), false));
        assert!(patterns.is_empty());
    }

    #[test]
    fn missing_files_return_empty() {
        let dir = tempdir().unwrap();
        let patterns = IgnorePatterns::load(dir.path(), &[".packignore"]).unwrap();
        assert!(patterns.is_empty());
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".packignore"), "# comment\n\n   \n").unwrap();
        let patterns = IgnorePatterns::load(dir.path(), &[".packignore"]).unwrap();
        assert!(patterns.is_empty());
    }

    #[test]
    fn bare_name_matches_at_any_depth() {
        let dir = tempdir().unwrap();
        let patterns =
            IgnorePatterns::from_content(dir.path(), &dir.path().join(".packignore"), "*.log\n")
                .unwrap();
        assert!(patterns.is_ignored(Path::new("latest.log"), false));
        assert!(patterns.is_ignored(Path::new("logs/debug/latest.log"), false));
        assert!(!patterns.is_ignored(Path::new("logs/latest.txt"), false));
    }

    #[test]
    fn anchored_directory_excludes_contents() {
        let dir = tempdir().unwrap();
        let patterns = IgnorePatterns::from_content(
            dir.path(),
            &dir.path().join(".packignore"),
            "/saves/\n",
        )
        .unwrap();
        assert!(patterns.is_ignored(Path::new("saves"), true));
        assert!(patterns.is_ignored(Path::new("saves/world/level.dat"), false));
        assert!(!patterns.is_ignored(Path::new("config/saves"), true));
    }

    #[test]
    fn later_file_negation_reincludes() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".packignore"), "*.cfg\n").unwrap();
        fs::write(dir.path().join(".client_files"), "!server.cfg\n").unwrap();
        let patterns =
            IgnorePatterns::load(dir.path(), &[".packignore", ".client_files"]).unwrap();
        assert_eq!(patterns.pattern_count(), 2);
        assert!(patterns.is_ignored(Path::new("client.cfg"), false));
        assert!(!patterns.is_ignored(Path::new("server.cfg"), false));
    }

    #[test]
    fn too_many_patterns_is_error() {
        let dir = tempdir().unwrap();
        let content: String = (0..=MAX_PATTERNS).map(|i| format!("f{}\n", i)).collect();
        let err =
            IgnorePatterns::from_content(dir.path(), &dir.path().join(".packignore"), &content)
                .unwrap_err();
        assert!(matches!(err, IgnoreError::TooManyPatterns { .. }));
    }

    #[test]
    fn oversized_file_is_error() {
        let dir = tempdir().unwrap();
        let big = "a".repeat(MAX_FILE_SIZE as usize + 1);
        fs::write(dir.path().join(".packignore"), big).unwrap();
        let err = IgnorePatterns::load(dir.path(), &[".packignore"]).unwrap_err();
        assert!(matches!(err, IgnoreError::FileTooLarge { .. }));
    }
}
