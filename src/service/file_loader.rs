// SPDX-License-Identifier: MIT OR Apache-2.0

//! Load-modify-save helper for config files.

use crate::adapters::ConfigFile;
use crate::domain::{Result, VersionedConfig};
use crate::migration::MigrationReport;
use crate::service::options::{LoadOptions, SaveOptions};
use crate::service::serializer::ConfigSerializer;
use std::path::{Path, PathBuf};

/// Edits a config stored in a file.
///
/// [`modify`](FileLoader::modify) loads the file if it exists (falling back to the
/// default config when it does not), hands the config to a closure, and writes
/// the result back to the same file.
///
/// # Examples
///
/// ```rust,no_run
/// use vercfg::prelude::*;
/// # #[derive(Default)]
/// # struct Settings { launches: u64 }
/// # impl VersionedConfig for Settings {
/// #     fn version() -> VersionTag { VersionTag::from(1) }
/// #     fn to_fields(&self) -> Payload {
/// #         let mut p = Payload::new();
/// #         p.insert("launches".into(), self.launches.to_dict());
/// #         p
/// #     }
/// #     fn from_fields(fields: &Fields<'_>) -> Result<Self> {
/// #         Ok(Settings { launches: fields.required("launches")? })
/// #     }
/// # }
///
/// # fn main() -> vercfg::domain::Result<()> {
/// let loader = FileLoader::<Settings>::new("settings.json")?;
/// let launches = loader.modify(|settings| {
///     settings.launches += 1;
///     settings.launches
/// })?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileLoader<C> {
    serializer: ConfigSerializer<C>,
    path: PathBuf,
    load_options: LoadOptions,
    save_options: SaveOptions,
}

impl<C: VersionedConfig> FileLoader<C> {
    /// Creates a loader for `path` with a serializer for `C`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::with_serializer(ConfigSerializer::new()?, path))
    }

    /// Creates a loader for `path` with an existing serializer.
    pub fn with_serializer<P: AsRef<Path>>(serializer: ConfigSerializer<C>, path: P) -> Self {
        Self {
            serializer,
            path: path.as_ref().to_path_buf(),
            load_options: LoadOptions::default(),
            save_options: SaveOptions::default(),
        }
    }

    /// Sets the options used when reading the file.
    pub fn load_options(mut self, options: LoadOptions) -> Self {
        self.load_options = options;
        self
    }

    /// Sets the options used when writing the file.
    pub fn save_options(mut self, options: SaveOptions) -> Self {
        self.save_options = options;
        self
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the serializer.
    pub fn serializer(&self) -> &ConfigSerializer<C> {
        &self.serializer
    }

    /// Loads the file into `config` if it exists.
    ///
    /// A missing file leaves `config` unchanged and returns `None`.
    pub fn load_into(&self, config: &mut C) -> Result<Option<MigrationReport>> {
        if !ConfigFile::new(&self.path).exists() {
            tracing::debug!(file = %self.path.display(), "config file not found, keeping current values");
            return Ok(None);
        }
        self.serializer
            .load_file(&self.path, config, &self.load_options)
    }

    /// Writes `config` to the file.
    pub fn save(&self, config: &C) -> Result<()> {
        self.serializer
            .to_file_with(config, &self.path, &self.save_options)
    }

    /// Loads `config` from the file if it exists, runs `f` on it, and saves it.
    pub fn modify_instance<F, R>(&self, config: &mut C, f: F) -> Result<R>
    where
        F: FnOnce(&mut C) -> R,
    {
        self.load_into(config)?;
        let out = f(config);
        self.save(config)?;
        Ok(out)
    }
}

impl<C: VersionedConfig + Default> FileLoader<C> {
    /// Reads the config from the file, or returns the default config if the file
    /// does not exist.
    pub fn load(&self) -> Result<C> {
        let mut config = C::default();
        self.load_into(&mut config)?;
        Ok(config)
    }

    /// Loads the config (or the default), runs `f` on it, and saves it.
    ///
    /// The file is written even if `f` leaves the config unchanged. Returns
    /// whatever `f` returns.
    pub fn modify<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut C) -> R,
    {
        let mut config = C::default();
        self.modify_instance(&mut config, f)
    }
}
