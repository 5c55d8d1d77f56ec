//! Local-directory backend
//!
//! Publishes into a directory on this machine, typically a network share
//! mounted from the game host.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::domain::ports::{BackendError, BackendResult, RemoteBackend};

/// Copy buffer size; also the progress callback granularity
const COPY_CHUNK: usize = 64 * 1024;

/// Remote backend backed by plain filesystem calls
#[derive(Debug, Clone)]
pub struct LocalDirBackend {
    root: PathBuf,
}

impl LocalDirBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open the target, rejecting a base path that exists but is not a directory
    pub fn connect(root: impl Into<PathBuf>) -> BackendResult<Self> {
        let backend = Self::new(root);
        if backend.root.exists() && !backend.root.is_dir() {
            return Err(BackendError::Connection(format!(
                "{} is not a directory",
                backend.root.display()
            )));
        }
        Ok(backend)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }
}

fn not_found_aware(path: &str, err: io::Error) -> BackendError {
    if err.kind() == io::ErrorKind::NotFound {
        BackendError::NotFound(path.to_string())
    } else {
        BackendError::Io(err)
    }
}

impl RemoteBackend for LocalDirBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn read_blob(&self, path: &str) -> BackendResult<Vec<u8>> {
        fs::read(self.resolve(path)).map_err(|e| not_found_aware(path, e))
    }

    fn write_blob(&self, path: &str, content: &[u8]) -> BackendResult<()> {
        let target = self.resolve(path);
        let parent = target.parent().unwrap_or(&self.root).to_path_buf();
        fs::create_dir_all(&parent)?;

        let mut tmp = NamedTempFile::new_in(&parent)?;
        tmp.write_all(content)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| BackendError::Io(e.error))?;
        Ok(())
    }

    fn ensure_directory(&self, path: &str) -> BackendResult<()> {
        fs::create_dir_all(self.resolve(path))?;
        Ok(())
    }

    fn upload(
        &self,
        local: &Path,
        remote: &str,
        on_progress: &mut dyn FnMut(u64, u64),
    ) -> BackendResult<()> {
        let mut reader = File::open(local)?;
        let total = reader.metadata()?.len();
        let mut writer = File::create(self.resolve(remote))?;

        on_progress(0, total);
        let mut buf = vec![0u8; COPY_CHUNK];
        let mut done = 0u64;
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n])?;
            done += n as u64;
            on_progress(done, total);
        }
        writer.flush()?;
        Ok(())
    }

    fn delete_one(&self, path: &str) -> BackendResult<()> {
        fs::remove_file(self.resolve(path)).map_err(|e| not_found_aware(path, e))
    }
}
