//! Pack Options

use std::fmt;
use std::path::PathBuf;

/// Which side of the modpack to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackMode {
    Client,
    Server,
}

impl PackMode {
    /// Build order when no mode is given
    pub const ALL: [PackMode; 2] = [PackMode::Client, PackMode::Server];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackMode::Client => "client",
            PackMode::Server => "server",
        }
    }

    /// Pattern files applied in this mode, lowest precedence first
    pub fn pattern_files(&self) -> &'static [&'static str] {
        match self {
            PackMode::Client => &[PACK_IGNORE_FILE],
            PackMode::Server => &[PACK_IGNORE_FILE, CLIENT_FILES_FILE],
        }
    }
}

impl fmt::Display for PackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patterns excluded from every pack
pub const PACK_IGNORE_FILE: &str = ".packignore";
/// Client-only content, excluded from the server pack
pub const CLIENT_FILES_FILE: &str = ".client_files";
/// Server-only content overlaid onto the server pack
pub const SERVER_PACK_DIR: &str = "server_pack";
/// Parent of the default output directories
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Options for the pack use case
#[derive(Debug, Clone)]
pub struct PackOptions {
    /// Project root to pack
    pub root: PathBuf,
    /// Single mode, or both when `None`
    pub mode: Option<PackMode>,
    /// Output directory for a single-mode build
    pub output: Option<PathBuf>,
}

impl PackOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: None,
            output: None,
        }
    }

    pub fn with_mode(mut self, mode: Option<PackMode>) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }
}
