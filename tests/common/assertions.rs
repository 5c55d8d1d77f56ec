//! Assertion helpers with descriptive failure messages.

use std::path::Path;

use super::env::TestResult;

/// List all files under a directory, relative and sorted
pub fn list_all_files(dir: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    walk(root, &path, out);
                } else if let Ok(rel) = path.strip_prefix(root) {
                    out.push(rel.to_string_lossy().replace('\\', "/"));
                }
            }
        }
    }
    let mut files = Vec::new();
    walk(dir, dir, &mut files);
    files.sort();
    files
}

/// Assert the command succeeded, printing its output otherwise
pub fn assert_success(result: &TestResult) {
    assert!(
        result.success,
        "expected success, got exit code {}\n{}",
        result.exit_code,
        result.combined_output()
    );
}

/// Assert the command failed with exit status 1
pub fn assert_failure(result: &TestResult) {
    assert_eq!(
        result.exit_code,
        1,
        "expected exit code 1\n{}",
        result.combined_output()
    );
}

/// Assert a directory holds exactly these files
pub fn assert_files(dir: &Path, expected: &[&str]) {
    let actual = list_all_files(dir);
    let mut expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(actual, expected, "unexpected files under {}", dir.display());
}
