// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the config serializer and its helpers.
//!
//! [`ConfigSerializer`] ties a schema, its migration registry and the codecs
//! together. [`FileLoader`] and [`VersionedConfigExt`] are conveniences built on it.

pub mod ext;
pub mod file_loader;
pub mod options;
pub mod serializer;

// Re-export commonly used types
pub use ext::VersionedConfigExt;
pub use file_loader::FileLoader;
pub use options::{LoadOptions, SaveOptions};
pub use serializer::ConfigSerializer;
