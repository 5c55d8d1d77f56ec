//! Terminal presentation helpers

pub mod format;
pub mod icon;
pub mod terminal;
