// SPDX-License-Identifier: MIT OR Apache-2.0

//! Migration runner.
//!
//! The runner reads a payload's version tag and applies registered migrations one
//! step at a time until the payload reaches the schema's current version. Steps
//! are chosen by version number, never by registration order.

use crate::domain::{ConfigError, Payload, Result, VersionTag, DEFAULT_VERSION_KEY};
use crate::migration::registry::MigrationRegistry;
use serde::Serialize;

/// Describes an upgrade the runner performed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// The version the payload was written with.
    pub from: VersionTag,
    /// The version the payload was upgraded to.
    pub to: VersionTag,
    /// The source version of every migration applied, in order.
    pub steps: Vec<VersionTag>,
}

impl MigrationReport {
    /// The number of migrations applied.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if no migrations were applied.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A payload at the current version, plus the report of how it got there.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    /// The payload, now at the current version.
    pub payload: Payload,
    /// `None` when the payload was already current.
    pub report: Option<MigrationReport>,
}

/// Walks a registry's migration chain to bring payloads up to date.
///
/// # Examples
///
/// ```
/// use vercfg::migration::{MigrationRegistry, MigrationRunner};
/// use serde_json::json;
///
/// let mut registry = MigrationRegistry::new(3);
/// registry.add_step(1, 2, |mut p| { p.insert("y".into(), json!(0)); p }).unwrap();
/// registry.add_step(2, 3, |mut p| {
///     if let Some(x) = p.remove("x") {
///         p.insert("value".into(), x);
///     }
///     p
/// }).unwrap();
///
/// let runner = MigrationRunner::new(&registry);
/// let payload = json!({"version": 1, "x": 1}).as_object().cloned().unwrap();
/// let resolved = runner.resolve(payload).unwrap();
/// assert_eq!(
///     serde_json::Value::Object(resolved.payload),
///     json!({"version": 3, "value": 1, "y": 0})
/// );
/// ```
#[derive(Debug)]
pub struct MigrationRunner<'a> {
    registry: &'a MigrationRegistry,
    version_key: &'a str,
    step_limit: usize,
}

impl<'a> MigrationRunner<'a> {
    /// Creates a runner over `registry`, reading the default `"version"` key.
    ///
    /// The step limit is one more than the number of registered migrations.
    pub fn new(registry: &'a MigrationRegistry) -> Self {
        Self {
            registry,
            version_key: DEFAULT_VERSION_KEY,
            step_limit: registry.len() + 1,
        }
    }

    /// Reads the version tag from a different reserved key.
    pub fn with_version_key(mut self, key: &'a str) -> Self {
        self.version_key = key;
        self
    }

    /// Overrides the maximum number of migration steps.
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = limit;
        self
    }

    /// Reads the version tag of a payload.
    pub fn version_of(&self, payload: &Payload) -> Result<VersionTag> {
        let value = payload
            .get(self.version_key)
            .ok_or_else(|| ConfigError::MissingVersion {
                key: self.version_key.to_string(),
            })?;
        VersionTag::from_value(value)
    }

    /// Upgrades `payload` to the registry's current version.
    ///
    /// A payload already at the current version is returned unchanged with no
    /// report.
    ///
    /// # Errors
    ///
    /// * `MissingVersion` / `InvalidVersion` if the version tag is absent or
    ///   malformed, before or after any step
    /// * `FutureVersion` if the payload, or a migration's output, is newer than
    ///   the current version
    /// * `NoMigrationPath` if no migration is registered for a version on the way
    /// * `NonProgressingMigration` if a migration does not advance the version
    /// * `MigrationCycle` if the step limit is exceeded
    pub fn resolve(&self, mut payload: Payload) -> Result<Resolved> {
        let current = self.registry.current_version();
        let original = self.version_of(&payload)?;

        if original == *current {
            return Ok(Resolved {
                payload,
                report: None,
            });
        }
        if original > *current {
            return Err(ConfigError::FutureVersion {
                found: original,
                current: current.clone(),
            });
        }

        let mut version = original.clone();
        let mut steps = Vec::new();

        while version != *current {
            if steps.len() >= self.step_limit {
                return Err(ConfigError::MigrationCycle {
                    steps: steps.len(),
                    current: current.clone(),
                });
            }

            let migration =
                self.registry
                    .lookup(&version)
                    .ok_or_else(|| ConfigError::NoMigrationPath {
                        version: version.clone(),
                        current: current.clone(),
                    })?;

            payload = migration.apply(payload);
            if let Some(to) = migration.to_version() {
                payload.insert(self.version_key.to_string(), to.to_value());
            }

            let next = self.version_of(&payload)?;
            tracing::debug!(from = %version, to = %next, "applied migration");

            if next <= version {
                return Err(ConfigError::NonProgressingMigration {
                    from: version,
                    produced: next,
                });
            }
            if next > *current {
                return Err(ConfigError::FutureVersion {
                    found: next,
                    current: current.clone(),
                });
            }

            steps.push(version);
            version = next;
        }

        // keep the schema's tag style in the upgraded payload
        payload.insert(self.version_key.to_string(), current.to_value());

        tracing::info!(
            from = %original,
            to = %current,
            steps = steps.len(),
            "migrated configuration payload"
        );

        Ok(Resolved {
            payload,
            report: Some(MigrationReport {
                from: original,
                to: current.clone(),
                steps,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    fn chain_registry() -> MigrationRegistry {
        let mut registry = MigrationRegistry::new(3);
        registry
            .add_migration(1, |mut p| {
                p.insert("y".into(), json!(0));
                p.insert("version".into(), json!(2));
                p
            })
            .unwrap();
        registry
            .add_migration(2, |mut p| {
                if let Some(x) = p.remove("x") {
                    p.insert("value".into(), x);
                }
                p.insert("version".into(), json!(3));
                p
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_chain_correctness() {
        let registry = chain_registry();
        let runner = MigrationRunner::new(&registry);
        let resolved = runner.resolve(payload(json!({"version": 1, "x": 1}))).unwrap();

        assert_eq!(
            Value::Object(resolved.payload),
            json!({"version": 3, "value": 1, "y": 0})
        );
        let report = resolved.report.unwrap();
        assert_eq!(report.from, VersionTag::from(1));
        assert_eq!(report.to, VersionTag::from(3));
        assert_eq!(report.steps, vec![VersionTag::from(1), VersionTag::from(2)]);
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_partial_chain_starts_mid_way() {
        let registry = chain_registry();
        let runner = MigrationRunner::new(&registry);
        let resolved = runner
            .resolve(payload(json!({"version": 2, "x": 5, "y": 9})))
            .unwrap();
        assert_eq!(
            Value::Object(resolved.payload),
            json!({"version": 3, "value": 5, "y": 9})
        );
        assert_eq!(resolved.report.unwrap().steps, vec![VersionTag::from(2)]);
    }

    #[test]
    fn test_current_payload_unchanged_and_idempotent() {
        let registry = chain_registry();
        let runner = MigrationRunner::new(&registry);
        let input = payload(json!({"version": 3, "value": 1}));

        let once = runner.resolve(input.clone()).unwrap();
        assert_eq!(once.payload, input);
        assert!(once.report.is_none());

        let twice = runner.resolve(once.payload.clone()).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn test_missing_version() {
        let registry = chain_registry();
        let err = MigrationRunner::new(&registry)
            .resolve(payload(json!({"x": 1})))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVersion { ref key } if key == "version"));
    }

    #[test]
    fn test_invalid_version() {
        let registry = chain_registry();
        let err = MigrationRunner::new(&registry)
            .resolve(payload(json!({"version": [1]})))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVersion { .. }));
    }

    #[test]
    fn test_future_version_runs_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = MigrationRegistry::new(3);
        for from in 1..3u64 {
            let calls = Arc::clone(&calls);
            registry
                .add_step(from, from + 1, move |p| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    p
                })
                .unwrap();
        }

        let err = MigrationRunner::new(&registry)
            .resolve(payload(json!({"version": 99})))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::FutureVersion { ref found, .. } if *found == VersionTag::from(99)
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stranded_version() {
        let mut registry = MigrationRegistry::new(7);
        registry.add_step(6, 7, |p| p).unwrap();
        let err = MigrationRunner::new(&registry)
            .resolve(payload(json!({"version": 5})))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NoMigrationPath { ref version, .. } if *version == VersionTag::from(5)
        ));
    }

    #[test]
    fn test_gap_in_chain() {
        let mut registry = MigrationRegistry::new(4);
        registry.add_step(1, 2, |p| p).unwrap();
        registry.add_step(3, 4, |p| p).unwrap();
        let err = MigrationRunner::new(&registry)
            .resolve(payload(json!({"version": 1})))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NoMigrationPath { ref version, .. } if *version == VersionTag::from(2)
        ));
    }

    #[test]
    fn test_non_progressing_migration() {
        let mut registry = MigrationRegistry::new(3);
        registry.add_migration(1, |mut p| {
            p.insert("version".into(), json!(2));
            p
        }).unwrap();
        registry.add_migration(2, |p| p).unwrap();

        let err = MigrationRunner::new(&registry)
            .resolve(payload(json!({"version": 1})))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonProgressingMigration { ref from, ref produced }
                if *from == VersionTag::from(2) && *produced == VersionTag::from(2)
        ));
    }

    #[test]
    fn test_backwards_migration_is_non_progressing() {
        let mut registry = MigrationRegistry::new(3);
        registry.add_migration(2, |mut p| {
            p.insert("version".into(), json!(1));
            p
        }).unwrap();
        let err = MigrationRunner::new(&registry)
            .resolve(payload(json!({"version": 2})))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NonProgressingMigration { .. }));
    }

    #[test]
    fn test_migration_dropping_version_key() {
        let mut registry = MigrationRegistry::new(2);
        registry.add_migration(1, |mut p| {
            p.remove("version");
            p
        }).unwrap();
        let err = MigrationRunner::new(&registry)
            .resolve(payload(json!({"version": 1})))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVersion { .. }));
    }

    #[test]
    fn test_overshooting_migration() {
        let mut registry = MigrationRegistry::new(2);
        registry.add_migration(1, |mut p| {
            p.insert("version".into(), json!(5));
            p
        }).unwrap();
        let err = MigrationRunner::new(&registry)
            .resolve(payload(json!({"version": 1})))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FutureVersion { .. }));
    }

    #[test]
    fn test_step_limit_reports_cycle() {
        let registry = chain_registry();
        let err = MigrationRunner::new(&registry)
            .with_step_limit(1)
            .resolve(payload(json!({"version": 1, "x": 1})))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MigrationCycle { steps: 1, .. }));
    }

    #[test]
    fn test_migrations_registered_out_of_order() {
        let mut registry = MigrationRegistry::new(4);
        registry.add_step(3, 4, |mut p| { p.insert("c".into(), json!(true)); p }).unwrap();
        registry.add_step(1, 2, |mut p| { p.insert("a".into(), json!(true)); p }).unwrap();
        registry.add_step(2, 3, |mut p| { p.insert("b".into(), json!(true)); p }).unwrap();

        let resolved = MigrationRunner::new(&registry)
            .resolve(payload(json!({"version": 1})))
            .unwrap();
        assert_eq!(
            Value::Object(resolved.payload),
            json!({"version": 4, "a": true, "b": true, "c": true})
        );
    }

    #[test]
    fn test_dotted_versions_and_style_normalization() {
        let mut registry = MigrationRegistry::new(VersionTag::parse("1.0.1").unwrap());
        registry
            .add_step(
                VersionTag::parse("1.0.0").unwrap(),
                VersionTag::parse("1.0.1").unwrap(),
                |mut p| {
                    p.remove("user_id");
                    p
                },
            )
            .unwrap();

        let resolved = MigrationRunner::new(&registry)
            .resolve(payload(json!({"version": "1.0.0", "user_id": 1234})))
            .unwrap();
        assert_eq!(Value::Object(resolved.payload), json!({"version": "1.0.1"}));
    }

    #[test]
    fn test_custom_version_key() {
        let mut registry = MigrationRegistry::new(2);
        registry.add_step(1, 2, |p| p).unwrap();
        let resolved = MigrationRunner::new(&registry)
            .with_version_key("schema")
            .resolve(payload(json!({"schema": 1, "version": "unrelated"})))
            .unwrap();
        assert_eq!(resolved.payload.get("schema"), Some(&json!(2)));
        assert_eq!(resolved.payload.get("version"), Some(&json!("unrelated")));
    }
}
