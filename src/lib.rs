// SPDX-License-Identifier: MIT OR Apache-2.0

//! Versioned configuration objects with chained schema migrations.
//!
//! A configuration type declares its current schema version and the migrations
//! that upgrade older payloads. Saved payloads carry their version tag under a
//! reserved key; loading an older payload walks the migration chain one version at
//! a time before the fields are mapped back onto the type.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`VersionTag`, `Payload`, `Fields`, errors) and the
//!   `VersionedConfig` / `CustomValue` traits
//! - **Migration Layer**: The migration registry and the runner that resolves versions
//! - **Ports**: Trait definitions for payload text formats (`PayloadCodec`)
//! - **Adapters**: JSON and YAML codecs and the config file adapter
//! - **Service**: `ConfigSerializer`, which ties a schema to its migrations and codecs
//!
//! # Features
//!
//! - **Chained Migrations**: One transform per old version, applied in version order
//! - **Safe Resolution**: Future, stranded and non-progressing versions are typed errors
//! - **Custom Values**: Field types convert to and from plain data recursively
//! - **Partial Loads and Saves**: `only` / `ignore` dotted field filters
//! - **Files**: JSON or YAML chosen by extension, OS-appropriate default locations
//!
//! # Feature Flags
//!
//! - `yaml`: Enable the YAML codec (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use vercfg::prelude::*;
//! use vercfg::versioned_config;
//!
//! fn migrations(registry: &mut MigrationRegistry) -> Result<()> {
//!     // version 1 stored the port as a string
//!     registry.add_step(1, 2, |mut payload| {
//!         let port = payload
//!             .get("port")
//!             .and_then(|v| v.as_str())
//!             .and_then(|s| s.parse::<u64>().ok());
//!         if let Some(port) = port {
//!             payload.insert("port".into(), port.into());
//!         }
//!         payload
//!     })
//! }
//!
//! versioned_config! {
//!     #[derive(Debug, PartialEq)]
//!     pub struct ServerConfig {
//!         @version = 2;
//!         @migrations = migrations;
//!         pub host: String = "localhost".to_string(),
//!         pub port: u16 = 8080,
//!     }
//! }
//!
//! # fn main() -> vercfg::domain::Result<()> {
//! let config = ServerConfig::from_json(r#"{"version": 1, "host": "example.org", "port": "443"}"#)?;
//! assert_eq!(config.port, 443);
//! assert_eq!(config.to_json()?, r#"{"host":"example.org","port":443,"version":2}"#);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

mod macros;

pub mod adapters;
pub mod domain;
pub mod migration;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::{ConfigFile, JsonCodec};
    pub use crate::domain::{
        ConfigError, CustomValue, FieldFilter, Fields, Payload, Result, VersionTag,
        VersionedConfig,
    };
    pub use crate::migration::{MigrationRegistry, MigrationReport, MigrationRunner};
    pub use crate::ports::PayloadCodec;
    pub use crate::service::{
        ConfigSerializer, FileLoader, LoadOptions, SaveOptions, VersionedConfigExt,
    };

    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlCodec;
}
