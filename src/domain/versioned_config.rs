// SPDX-License-Identifier: MIT OR Apache-2.0

//! Versioned configuration schema trait.
//!
//! This module defines [`VersionedConfig`], the schema description a configuration
//! type provides: its current version, how its fields map to a payload, and which
//! migrations upgrade older payloads.

use crate::domain::errors::Result;
use crate::domain::payload::{Fields, Payload};
use crate::domain::version::VersionTag;
use crate::migration::MigrationRegistry;

/// The default reserved key holding a payload's version tag.
pub const DEFAULT_VERSION_KEY: &str = "version";

/// A configuration type with a versioned payload representation.
///
/// Implementations describe the schema; loading, upgrading and saving are done by
/// [`ConfigSerializer`](crate::service::ConfigSerializer). The
/// [`versioned_config!`](crate::versioned_config) macro generates an
/// implementation from a field list.
///
/// # Examples
///
/// ```
/// use vercfg::prelude::*;
/// use serde_json::json;
///
/// #[derive(Debug, PartialEq)]
/// struct UserConfig {
///     user_name: String,
///     score: i64,
/// }
///
/// impl VersionedConfig for UserConfig {
///     fn version() -> VersionTag {
///         VersionTag::parse("1.0.1").unwrap()
///     }
///
///     fn to_fields(&self) -> Payload {
///         let mut payload = Payload::new();
///         payload.insert("user_name".into(), self.user_name.to_dict());
///         payload.insert("score".into(), self.score.to_dict());
///         payload
///     }
///
///     fn from_fields(fields: &Fields<'_>) -> Result<Self> {
///         Ok(UserConfig {
///             user_name: fields.required("user_name")?,
///             score: fields.required("score")?,
///         })
///     }
///
///     fn register_migrations(registry: &mut MigrationRegistry) -> Result<()> {
///         registry.add_step(VersionTag::parse("1.0.0")?, VersionTag::parse("1.0.1")?, |mut payload| {
///             payload.remove("user_id");
///             payload.insert("score".into(), json!(1001));
///             payload
///         })
///     }
/// }
///
/// let old = json!({"version": "1.0.0", "user_name": "jack", "user_id": 1234, "score": [1001, 18]});
/// let config = UserConfig::from_dict(old.as_object().unwrap().clone()).unwrap();
/// assert_eq!(config, UserConfig { user_name: "jack".into(), score: 1001 });
/// ```
pub trait VersionedConfig: Sized {
    /// The reserved payload key holding the version tag.
    const VERSION_KEY: &'static str = DEFAULT_VERSION_KEY;

    /// The current version of the schema.
    fn version() -> VersionTag;

    /// Converts every field to plain data. The version key is added by the caller.
    fn to_fields(&self) -> Payload;

    /// Builds a config from the fields of a payload already at the current version.
    ///
    /// Keys that no read consumes are reported by the loader, so implementations
    /// only read the fields they know.
    fn from_fields(fields: &Fields<'_>) -> Result<Self>;

    /// Registers the migrations that upgrade older payloads of this schema.
    fn register_migrations(_registry: &mut MigrationRegistry) -> Result<()> {
        Ok(())
    }
}
