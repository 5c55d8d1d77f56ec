//! Common test utilities for packdeploy CLI tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated project, target and home directories
//! - Helpers to run the binary against the local-directory backend
//! - Assertion helpers with descriptive failures

#![allow(dead_code)]

pub mod assertions;
pub mod env;

pub use assertions::*;
pub use env::*;
