//! Domain Entities
//!
//! - `StateMapping` - relative path to content fingerprint, local or recorded

mod state_mapping;

pub use state_mapping::{FileRecord, Fingerprint, StateMapping};
