// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the versioned configuration crate.
//!
//! Every failure that can happen while registering migrations, upgrading a payload,
//! or mapping a payload onto a configuration type is a variant of [`ConfigError`].
//! Variants carry the offending version or field so callers can branch on them
//! without matching on message text.

use crate::domain::version::VersionTag;
use thiserror::Error;

/// The main error type for versioned configuration operations.
///
/// It is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use vercfg::domain::{ConfigError, VersionTag};
///
/// let error = ConfigError::FutureVersion {
///     found: VersionTag::from(99),
///     current: VersionTag::from(3),
/// };
/// assert!(error.to_string().contains("99"));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The payload does not contain the reserved version key.
    #[error("Payload has no version tag under key '{key}'")]
    MissingVersion {
        /// The reserved key that was looked up
        key: String,
    },

    /// The reserved version key holds something that is not a version tag.
    #[error("Invalid version tag {value}: {message}")]
    InvalidVersion {
        /// The raw JSON text of the rejected value
        value: String,
        /// Why the value was rejected
        message: String,
    },

    /// The payload was written by a newer schema than this code understands.
    #[error("Payload version {found} is newer than the current version {current}")]
    FutureVersion {
        /// The version found in the payload
        found: VersionTag,
        /// The current version of the schema
        current: VersionTag,
    },

    /// No migration is registered for an older payload version.
    #[error("No migration registered for version {version} (current version is {current})")]
    NoMigrationPath {
        /// The stranded version
        version: VersionTag,
        /// The current version of the schema
        current: VersionTag,
    },

    /// A migration produced a payload whose version did not advance.
    #[error("Migration from version {from} produced version {produced}, which does not advance")]
    NonProgressingMigration {
        /// The source version of the migration
        from: VersionTag,
        /// The version found after running it
        produced: VersionTag,
    },

    /// The migration runner exceeded its step bound.
    #[error("Migration did not reach version {current} within {steps} steps")]
    MigrationCycle {
        /// The number of steps taken before giving up
        steps: usize,
        /// The current version of the schema
        current: VersionTag,
    },

    /// A migration was registered twice for the same source version.
    #[error("A migration from version {version} is already registered")]
    DuplicateMigration {
        /// The source version that was registered twice
        version: VersionTag,
    },

    /// A migration was registered for a version the schema cannot migrate from.
    #[error("Migration version {version} is out of range for current version {current}")]
    MigrationOutOfRange {
        /// The offending version
        version: VersionTag,
        /// The current version of the schema
        current: VersionTag,
    },

    /// A migrated payload does not fit the configuration schema.
    #[error("Schema mismatch at field '{field}': {message}")]
    SchemaMismatch {
        /// The dotted path of the offending field
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// A custom value rejected its plain-data representation.
    #[error("Failed to deserialize {type_name}: {message}")]
    Deserialization {
        /// The name of the type being reconstructed
        type_name: String,
        /// What was wrong with the input
        message: String,
    },

    /// A built-in plain value had the wrong JSON shape.
    ///
    /// This carries no field context. [`Fields`](crate::domain::Fields) converts it
    /// into `SchemaMismatch` or `Deserialization` once the field is known.
    #[error("Invalid {expected} value: {message}")]
    TypeMismatch {
        /// The expected type or shape
        expected: String,
        /// The JSON shape that was found
        found: &'static str,
        /// What was wrong with the value
        message: String,
    },

    /// `only` and `ignore` field filters were combined.
    #[error("Cannot use both 'only' and 'ignore' field filters")]
    InvalidFilter,

    /// Failed to decode payload text.
    #[error("Failed to parse configuration: {message}")]
    Parse {
        /// The error message
        message: String,
        /// The underlying codec error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to encode a payload as text.
    #[error("Failed to encode configuration: {message}")]
    Encode {
        /// The error message
        message: String,
        /// The underlying codec error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A configuration file could not be used.
    #[error("Configuration file '{path}' error: {message}")]
    Source {
        /// The file involved
        path: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading or writing configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a `Deserialization` error for the type `T`.
    pub fn deserialization<T: ?Sized>(message: impl Into<String>) -> Self {
        ConfigError::Deserialization {
            type_name: short_type_name::<T>().to_string(),
            message: message.into(),
        }
    }

    /// Creates a `SchemaMismatch` error for a field.
    pub fn schema_mismatch(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::SchemaMismatch {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a `Parse` error from a codec error.
    pub fn parse<E>(format: &str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::Parse {
            message: format!("Failed to parse {}: {}", format, err),
            source: Some(Box::new(err)),
        }
    }

    /// Creates an `Encode` error from a codec error.
    pub fn encode<E>(format: &str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::Encode {
            message: format!("Failed to encode {}: {}", format, err),
            source: Some(Box::new(err)),
        }
    }

    /// Returns true for the errors raised while resolving a payload's version.
    pub fn is_migration_error(&self) -> bool {
        matches!(
            self,
            ConfigError::MissingVersion { .. }
                | ConfigError::InvalidVersion { .. }
                | ConfigError::FutureVersion { .. }
                | ConfigError::NoMigrationPath { .. }
                | ConfigError::NonProgressingMigration { .. }
                | ConfigError::MigrationCycle { .. }
        )
    }
}

/// Strips the module path from `std::any::type_name`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    // generics keep their paths, only the outer one is trimmed
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
