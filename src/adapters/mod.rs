// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing codec and file implementations.
//!
//! This module contains concrete implementations of the [`PayloadCodec`] port and
//! the file adapter that stores payloads on disk.

pub mod file;
pub mod json;
#[cfg(feature = "yaml")]
pub mod yaml;

pub use file::{ConfigFile, MAX_CONFIG_FILE_SIZE};
pub use json::JsonCodec;
#[cfg(feature = "yaml")]
pub use yaml::YamlCodec;

use crate::ports::PayloadCodec;
use std::path::Path;

/// Returns the codecs compiled into this build.
pub fn available_codecs() -> Vec<Box<dyn PayloadCodec>> {
    let mut codecs: Vec<Box<dyn PayloadCodec>> = vec![Box::new(JsonCodec::new())];
    #[cfg(feature = "yaml")]
    codecs.push(Box::new(YamlCodec::new()));
    codecs
}

/// Picks a codec for a path by its extension.
///
/// Paths without a recognized extension use JSON.
///
/// # Examples
///
/// ```rust
/// use vercfg::adapters::codec_for_path;
/// use std::path::Path;
///
/// assert_eq!(codec_for_path(Path::new("app.json")).name(), "json");
/// assert_eq!(codec_for_path(Path::new("app.conf")).name(), "json");
/// ```
pub fn codec_for_path(path: &Path) -> Box<dyn PayloadCodec> {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return Box::new(JsonCodec::new());
    };

    available_codecs()
        .into_iter()
        .find(|codec| codec.supports_extension(ext))
        .unwrap_or_else(|| Box::new(JsonCodec::new()))
}
