// SPDX-License-Identifier: MIT OR Apache-2.0

//! Migration layer: the registry of upgrade transforms and the runner that walks it.
//!
//! A configuration schema registers one transform per older version. When a payload
//! written with an older version is loaded, the runner applies the transforms in
//! version order until the payload matches the current schema.

pub mod registry;
pub mod runner;

// Re-export commonly used types
pub use registry::{Migration, MigrationRegistry, Transform};
pub use runner::{MigrationReport, MigrationRunner, Resolved};
