// SPDX-License-Identifier: MIT OR Apache-2.0

//! Migration registry.
//!
//! A [`MigrationRegistry`] stores the upgrade transforms of one configuration
//! schema, keyed by the version each transform migrates from. Together with the
//! schema's current version the entries form a single linear chain; the registry
//! rejects the registrations that would break that at insert time, and the
//! [`MigrationRunner`](crate::migration::MigrationRunner) checks the rest while it
//! walks the chain.

use crate::domain::{ConfigError, Payload, Result, VersionTag};
use std::collections::BTreeMap;
use std::fmt;

/// A boxed payload transform.
pub type Transform = Box<dyn Fn(Payload) -> Payload + Send + Sync>;

/// A single registered migration.
pub struct Migration {
    from: VersionTag,
    to: Option<VersionTag>,
    transform: Transform,
}

impl Migration {
    /// The version this migration upgrades from.
    pub fn from_version(&self) -> &VersionTag {
        &self.from
    }

    /// The version this migration declares it produces, if it declares one.
    ///
    /// Migrations registered with [`MigrationRegistry::add_migration`] write their
    /// own version tag and declare nothing.
    pub fn to_version(&self) -> Option<&VersionTag> {
        self.to.as_ref()
    }

    /// Runs the transform.
    pub fn apply(&self, payload: Payload) -> Payload {
        (self.transform)(payload)
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

/// The set of upgrade transforms for one configuration schema.
///
/// Registration takes `&mut self`, so a registry is filled in during a single
/// initialization phase and only read afterwards. A built registry is `Send + Sync`
/// and can be shared between threads loading configs of the same schema.
///
/// # Examples
///
/// ```
/// use vercfg::migration::MigrationRegistry;
/// use vercfg::domain::{ConfigError, VersionTag};
/// use serde_json::json;
///
/// let mut registry = MigrationRegistry::new(3);
/// registry
///     .add_migration(1, |mut payload| {
///         payload.insert("y".into(), json!(0));
///         payload.insert("version".into(), json!(2));
///         payload
///     })
///     .unwrap();
///
/// let again = registry.add_migration(1, |payload| payload);
/// assert!(matches!(again, Err(ConfigError::DuplicateMigration { .. })));
/// assert!(registry.lookup(&VersionTag::from(1)).is_some());
/// assert!(registry.lookup(&VersionTag::from(2)).is_none());
/// ```
pub struct MigrationRegistry {
    current: VersionTag,
    migrations: BTreeMap<VersionTag, Migration>,
}

impl MigrationRegistry {
    /// Creates an empty registry for a schema whose current version is `current`.
    pub fn new(current: impl Into<VersionTag>) -> Self {
        Self {
            current: current.into(),
            migrations: BTreeMap::new(),
        }
    }

    /// Registers a transform for payloads at `from`.
    ///
    /// The transform must write the next version tag into the payload it returns.
    ///
    /// # Errors
    ///
    /// * `DuplicateMigration` if a migration from `from` is already registered.
    ///   The earlier registration stays in place.
    /// * `MigrationOutOfRange` if `from` is not older than the current version.
    pub fn add_migration<F>(&mut self, from: impl Into<VersionTag>, transform: F) -> Result<()>
    where
        F: Fn(Payload) -> Payload + Send + Sync + 'static,
    {
        self.insert(from.into(), None, Box::new(transform))
    }

    /// Registers a transform from `from` to `to`.
    ///
    /// The runner writes `to` into the payload after the transform returns, so the
    /// transform only has to move fields around.
    ///
    /// # Errors
    ///
    /// As [`add_migration`](Self::add_migration), plus `NonProgressingMigration` if
    /// `to` is not newer than `from` and `MigrationOutOfRange` if `to` is newer
    /// than the current version.
    pub fn add_step<F>(
        &mut self,
        from: impl Into<VersionTag>,
        to: impl Into<VersionTag>,
        transform: F,
    ) -> Result<()>
    where
        F: Fn(Payload) -> Payload + Send + Sync + 'static,
    {
        let (from, to) = (from.into(), to.into());
        if to <= from {
            return Err(ConfigError::NonProgressingMigration { from, produced: to });
        }
        if to > self.current {
            return Err(ConfigError::MigrationOutOfRange {
                version: to,
                current: self.current.clone(),
            });
        }
        self.insert(from, Some(to), Box::new(transform))
    }

    fn insert(&mut self, from: VersionTag, to: Option<VersionTag>, transform: Transform) -> Result<()> {
        if from >= self.current {
            return Err(ConfigError::MigrationOutOfRange {
                version: from,
                current: self.current.clone(),
            });
        }
        if self.migrations.contains_key(&from) {
            return Err(ConfigError::DuplicateMigration { version: from });
        }

        tracing::debug!(from = %from, to = ?to.as_ref().map(ToString::to_string), "registered migration");
        self.migrations.insert(
            from.clone(),
            Migration {
                from,
                to,
                transform,
            },
        );
        Ok(())
    }

    /// Returns the migration registered for `version`, if any.
    pub fn lookup(&self, version: &VersionTag) -> Option<&Migration> {
        self.migrations.get(version)
    }

    /// The current version of the schema this registry belongs to.
    pub fn current_version(&self) -> &VersionTag {
        &self.current
    }

    /// The number of registered migrations.
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// Returns true if no migrations are registered.
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    /// The registered source versions in ascending order.
    pub fn versions(&self) -> impl Iterator<Item = &VersionTag> {
        self.migrations.keys()
    }
}

impl fmt::Debug for MigrationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationRegistry")
            .field("current", &self.current)
            .field("migrations", &self.migrations.values().collect::<Vec<_>>())
            .finish()
    }
}
