// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types.
//!
//! This module holds the types every other layer speaks in: version tags, payloads
//! and the typed reader over them, the custom value protocol, field filters, the
//! schema trait, and errors. It has no knowledge of text formats or files.

pub mod custom_value;
pub mod errors;
pub mod filter;
pub mod payload;
pub mod version;
pub mod versioned_config;

// Re-export commonly used types
pub use custom_value::{from_plain_value, json_kind, to_plain_value, CustomValue};
pub use errors::{ConfigError, Result};
pub use filter::FieldFilter;
pub use payload::{into_payload, Fields, Payload};
pub use version::VersionTag;
pub use versioned_config::{VersionedConfig, DEFAULT_VERSION_KEY};
