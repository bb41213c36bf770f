// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config serializer.
//!
//! [`ConfigSerializer`] owns a schema's migration registry and turns payloads, JSON
//! text and files into config values and back, upgrading older payloads on the
//! way in.

use crate::adapters::{ConfigFile, JsonCodec};
use crate::domain::{ConfigError, Fields, Payload, Result, VersionTag, VersionedConfig};
use crate::migration::{MigrationRegistry, MigrationReport, MigrationRunner, Resolved};
use crate::ports::PayloadCodec;
use crate::service::options::{LoadOptions, SaveOptions};
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Loads and saves configs of type `C`.
///
/// The serializer is built once per schema. Its registry is read-only afterwards,
/// so a serializer can be shared across threads by reference.
///
/// # Examples
///
/// ```rust
/// use vercfg::prelude::*;
/// use serde_json::json;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Window {
///     width: u32,
///     height: u32,
/// }
///
/// impl VersionedConfig for Window {
///     fn version() -> VersionTag {
///         VersionTag::from(2)
///     }
///
///     fn to_fields(&self) -> Payload {
///         let mut payload = Payload::new();
///         payload.insert("width".into(), self.width.to_dict());
///         payload.insert("height".into(), self.height.to_dict());
///         payload
///     }
///
///     fn from_fields(fields: &Fields<'_>) -> Result<Self> {
///         Ok(Window {
///             width: fields.required("width")?,
///             height: fields.required("height")?,
///         })
///     }
///
///     fn register_migrations(registry: &mut MigrationRegistry) -> Result<()> {
///         registry.add_step(1, 2, |mut payload| {
///             if let Some(size) = payload.remove("size") {
///                 payload.insert("width".into(), size.clone());
///                 payload.insert("height".into(), size);
///             }
///             payload
///         })
///     }
/// }
///
/// # fn main() -> vercfg::domain::Result<()> {
/// let serializer = ConfigSerializer::<Window>::new()?;
/// let window = serializer.from_json(r#"{"version": 1, "size": 640}"#)?;
/// assert_eq!(window, Window { width: 640, height: 640 });
/// assert_eq!(serializer.to_json(&window)?, r#"{"height":640,"version":2,"width":640}"#);
/// # Ok(())
/// # }
/// ```
pub struct ConfigSerializer<C> {
    registry: MigrationRegistry,
    _config: PhantomData<fn() -> C>,
}

impl<C: VersionedConfig> ConfigSerializer<C> {
    /// Creates a serializer with the migrations `C` registers.
    ///
    /// # Errors
    ///
    /// Any registration error raised by `C::register_migrations`.
    pub fn new() -> Result<Self> {
        let mut registry = MigrationRegistry::new(C::version());
        C::register_migrations(&mut registry)?;
        tracing::debug!(
            current = %registry.current_version(),
            migrations = registry.len(),
            "built config serializer"
        );
        Ok(Self {
            registry,
            _config: PhantomData,
        })
    }

    /// Creates a serializer around an explicit registry.
    ///
    /// # Errors
    ///
    /// `MigrationOutOfRange` if the registry's current version differs from
    /// `C::version()`.
    pub fn with_registry(registry: MigrationRegistry) -> Result<Self> {
        let expected = C::version();
        if *registry.current_version() != expected {
            return Err(ConfigError::MigrationOutOfRange {
                version: registry.current_version().clone(),
                current: expected,
            });
        }
        Ok(Self {
            registry,
            _config: PhantomData,
        })
    }

    /// Returns the migration registry.
    pub fn registry(&self) -> &MigrationRegistry {
        &self.registry
    }

    /// Returns the schema's current version.
    pub fn current_version(&self) -> &VersionTag {
        self.registry.current_version()
    }

    /// Returns a migration runner reading `C`'s version key.
    pub fn runner(&self) -> MigrationRunner<'_> {
        MigrationRunner::new(&self.registry).with_version_key(C::VERSION_KEY)
    }

    /// Upgrades a payload to the current version without mapping its fields.
    pub fn resolve(&self, payload: Payload) -> Result<Resolved> {
        self.runner().resolve(payload)
    }

    /// Converts a config to a payload stamped with the current version.
    pub fn to_dict(&self, config: &C) -> Payload {
        Self::dict_of(config, &SaveOptions::default())
    }

    /// Converts a config to a payload, keeping only the fields `options` selects.
    ///
    /// The version key is always written.
    pub fn to_dict_with(&self, config: &C, options: &SaveOptions) -> Payload {
        Self::dict_of(config, options)
    }

    pub(crate) fn dict_of(config: &C, options: &SaveOptions) -> Payload {
        let mut payload = options.field_filter().apply(&config.to_fields());
        payload.insert(C::VERSION_KEY.to_string(), C::version().to_value());
        payload
    }

    /// Builds a config from a payload, upgrading it first if it is older.
    ///
    /// # Errors
    ///
    /// * Any migration error from [`MigrationRunner::resolve`]
    /// * `SchemaMismatch` if a field is missing, has the wrong shape, or is not
    ///   recognized
    /// * `Deserialization` if a custom value rejects its data
    pub fn from_dict(&self, payload: Payload) -> Result<C> {
        let resolved = self.resolve(payload)?;
        let fields = Fields::for_config(&resolved.payload).skipping(C::VERSION_KEY);
        let config = C::from_fields(&fields)?;
        fields.deny_unknown()?;
        Ok(config)
    }

    /// Loads a payload into an existing config.
    ///
    /// Only the fields selected by the options' filter are loaded; the others keep
    /// their current values. A loaded field is replaced whole, so a map-valued field
    /// holds exactly the payload's entries afterwards. A field is merged key by key
    /// only when the filter names a path below it. `target` is left untouched on
    /// error.
    ///
    /// Returns the migration report, or `None` if the payload was already current.
    pub fn load_dict(
        &self,
        payload: Payload,
        target: &mut C,
        options: &LoadOptions,
    ) -> Result<Option<MigrationReport>> {
        let Resolved {
            mut payload,
            report,
        } = self.resolve(payload)?;
        payload.remove(C::VERSION_KEY);

        let filter = options.field_filter();
        let merged = if options.is_validating() && filter.is_all() {
            payload
        } else {
            let mut base = target.to_fields();
            filter.overlay(&mut base, &payload);
            base
        };

        let fields = Fields::for_config(&merged);
        let loaded = C::from_fields(&fields)?;
        if options.is_validating() {
            fields.deny_unknown()?;
        } else {
            let unused = fields.unused();
            if !unused.is_empty() {
                tracing::warn!(fields = ?unused, "ignored unrecognized config fields");
            }
        }

        *target = loaded;
        Ok(report)
    }

    /// Encodes a config as compact JSON.
    pub fn to_json(&self, config: &C) -> Result<String> {
        self.to_json_with(config, &SaveOptions::default())
    }

    /// Encodes a config as JSON using the indent and filter in `options`.
    pub fn to_json_with(&self, config: &C, options: &SaveOptions) -> Result<String> {
        JsonCodec::new().encode(&Self::dict_of(config, options), options.indent_width())
    }

    /// Builds a config from JSON text.
    ///
    /// # Errors
    ///
    /// `Parse` if the text is not a JSON object, otherwise as
    /// [`from_dict`](Self::from_dict).
    pub fn from_json(&self, text: &str) -> Result<C> {
        self.from_dict(JsonCodec::new().decode(text)?)
    }

    /// Loads JSON text into an existing config. See [`load_dict`](Self::load_dict).
    pub fn load_json(
        &self,
        text: &str,
        target: &mut C,
        options: &LoadOptions,
    ) -> Result<Option<MigrationReport>> {
        self.load_dict(JsonCodec::new().decode(text)?, target, options)
    }

    /// Writes a config to a file. The format follows the file extension.
    pub fn to_file<P: AsRef<Path>>(&self, config: &C, path: P) -> Result<()> {
        self.to_file_with(config, path, &SaveOptions::default())
    }

    /// Writes a config to a file using the indent and filter in `options`.
    pub fn to_file_with<P: AsRef<Path>>(
        &self,
        config: &C,
        path: P,
        options: &SaveOptions,
    ) -> Result<()> {
        ConfigFile::new(path).write(&Self::dict_of(config, options), options.indent_width())
    }

    /// Reads a config from a file. The format follows the file extension.
    ///
    /// # Errors
    ///
    /// `Source` if the file cannot be read, `Parse` if it cannot be decoded,
    /// otherwise as [`from_dict`](Self::from_dict).
    pub fn from_file<P: AsRef<Path>>(&self, path: P) -> Result<C> {
        self.from_dict(ConfigFile::new(path).read()?)
    }

    /// Loads a file into an existing config. See [`load_dict`](Self::load_dict).
    pub fn load_file<P: AsRef<Path>>(
        &self,
        path: P,
        target: &mut C,
        options: &LoadOptions,
    ) -> Result<Option<MigrationReport>> {
        self.load_dict(ConfigFile::new(path).read()?, target, options)
    }

    /// Returns the OS-appropriate path for a configuration file.
    pub fn default_path(qualifier: &str, app_name: &str, file_name: &str) -> Result<PathBuf> {
        ConfigFile::default_path(qualifier, app_name, file_name)
    }
}

impl<C: VersionedConfig + Default> ConfigSerializer<C> {
    /// Resets every field of `config` to its default value.
    pub fn reset_to_defaults(config: &mut C) {
        *config = C::default();
    }
}

impl<C> fmt::Debug for ConfigSerializer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSerializer")
            .field("config", &std::any::type_name::<C>())
            .field("registry", &self.registry)
            .finish()
    }
}
