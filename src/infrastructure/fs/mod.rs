//! Local File System
//!
//! Reading and fingerprinting the local build tree.

mod fingerprint;

pub use fingerprint::{fingerprint_file, local_path, Fingerprinter};
