// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file adapter.
//!
//! Reads and writes whole payloads to disk through a [`PayloadCodec`] picked
//! from the file extension, and resolves OS-appropriate default locations.

use crate::adapters::codec_for_path;
use crate::domain::{ConfigError, Payload, Result};
use crate::ports::PayloadCodec;
use directories::ProjectDirs;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed size for configuration files (10MB)
pub const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// A configuration file on disk together with the codec used for it.
///
/// # Examples
///
/// ```rust,no_run
/// use vercfg::adapters::ConfigFile;
///
/// let file = ConfigFile::new("/etc/myapp/config.json");
/// let payload = file.read().unwrap();
/// file.write(&payload, Some(2)).unwrap();
/// ```
pub struct ConfigFile {
    path: PathBuf,
    codec: Box<dyn PayloadCodec>,
}

impl ConfigFile {
    /// Creates a file handle, choosing the codec from the path's extension.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let codec = codec_for_path(&path);
        Self { path, codec }
    }

    /// Creates a file handle with an explicit codec.
    pub fn with_codec<P: AsRef<Path>>(path: P, codec: Box<dyn PayloadCodec>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            codec,
        }
    }

    /// Returns the OS-appropriate path for a configuration file.
    ///
    /// # Arguments
    ///
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `file_name` - The configuration file name (e.g., "settings.json")
    ///
    /// # Errors
    ///
    /// `Source` if no home directory can be determined.
    pub fn default_path(qualifier: &str, app_name: &str, file_name: &str) -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::Source {
                path: file_name.to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Ok(proj_dirs.config_dir().join(file_name))
    }

    /// Creates a file handle in the OS-appropriate configuration directory.
    pub fn from_default_location(qualifier: &str, app_name: &str, file_name: &str) -> Result<Self> {
        Ok(Self::new(Self::default_path(qualifier, app_name, file_name)?))
    }

    /// Returns the path to the configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the codec used for this file.
    pub fn codec(&self) -> &dyn PayloadCodec {
        self.codec.as_ref()
    }

    /// Returns true if the file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads and decodes the file.
    ///
    /// # Errors
    ///
    /// `Source` if the file is missing, unreadable or larger than
    /// [`MAX_CONFIG_FILE_SIZE`]; `Parse` if its content cannot be decoded.
    pub fn read(&self) -> Result<Payload> {
        let canonical_path = self.path.canonicalize().map_err(|e| ConfigError::Source {
            path: display_name(&self.path),
            message: "Invalid or inaccessible path".to_string(),
            source: Some(Box::new(e)),
        })?;

        let metadata = fs::metadata(&canonical_path).map_err(|e| ConfigError::Source {
            path: display_name(&canonical_path),
            message: "Failed to read file metadata".to_string(),
            source: Some(Box::new(e)),
        })?;

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Source {
                path: display_name(&canonical_path),
                message: format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_CONFIG_FILE_SIZE
                ),
                source: None,
            });
        }

        let content = fs::read_to_string(&canonical_path).map_err(|e| ConfigError::Source {
            path: display_name(&canonical_path),
            message: "Failed to read configuration file".to_string(),
            source: Some(Box::new(e)),
        })?;

        tracing::debug!(
            file = %canonical_path.display(),
            codec = self.codec.name(),
            bytes = content.len(),
            "Read configuration file"
        );
        self.codec.decode(&content)
    }

    /// Encodes a payload and writes it to the file, replacing any previous content.
    ///
    /// Missing parent directories are created.
    pub fn write(&self, payload: &Payload, indent: Option<usize>) -> Result<()> {
        let content = self.codec.encode(payload, indent)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Source {
                path: display_name(&self.path),
                message: "Failed to create configuration directory".to_string(),
                source: Some(Box::new(e)),
            })?;
        }

        fs::write(&self.path, content.as_bytes()).map_err(|e| ConfigError::Source {
            path: display_name(&self.path),
            message: "Failed to write configuration file".to_string(),
            source: Some(Box::new(e)),
        })?;

        tracing::debug!(
            file = %self.path.display(),
            codec = self.codec.name(),
            bytes = content.len(),
            "Wrote configuration file"
        );
        Ok(())
    }
}

impl fmt::Debug for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFile")
            .field("path", &self.path)
            .field("codec", &self.codec.name())
            .finish()
    }
}

// Only the file name goes into error messages.
fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}
