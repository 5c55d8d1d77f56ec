//! Domain Layer
//!
//! Pure deploy logic without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - State mappings (path → hash, size)
//! - `value_objects/` - Immutable value types (ContentHash, RelativePath, IgnorePatterns)
//! - `services/` - Planner and progress throttling
//! - `ports/` - Interface definitions for infrastructure (backends, manifest, events)
//!
//! ## Design Principles
//!
//! 1. **No remote I/O** - Remote access only ever happens through ports
//! 2. **Pure Functions** - Planning is a function of its inputs
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
