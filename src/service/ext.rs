// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shorthand methods on every [`VersionedConfig`].
//!
//! Each method builds a throwaway [`ConfigSerializer`]. Code that loads many
//! payloads of the same schema should keep a serializer instead.

use crate::domain::{Payload, Result, VersionedConfig};
use crate::service::options::SaveOptions;
use crate::service::serializer::ConfigSerializer;
use std::path::Path;

/// Serializer shorthands available on every [`VersionedConfig`] type.
///
/// # Name overlap with `CustomValue`
///
/// `to_dict` and `from_dict` share their names with
/// [`CustomValue`](crate::domain::CustomValue)'s methods. A type implementing
/// both traits, such as a config nested as a field of another config, must call
/// them with qualified syntax:
///
/// ```rust
/// use vercfg::prelude::*;
/// use vercfg::versioned_config;
/// use serde_json::Value;
///
/// versioned_config! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Plugin {
///         @version = 2;
///         pub enabled: bool = true,
///     }
/// }
///
/// // nested plugins keep their own version tag
/// impl CustomValue for Plugin {
///     fn to_dict(&self) -> Value {
///         Value::Object(VersionedConfigExt::to_dict(self))
///     }
///
///     fn from_dict(value: &Value) -> Result<Self> {
///         let payload = value
///             .as_object()
///             .cloned()
///             .ok_or_else(|| ConfigError::deserialization::<Self>("expected an object"))?;
///         <Self as VersionedConfigExt>::from_dict(payload)
///     }
/// }
///
/// let plugin = Plugin::default();
/// let payload = VersionedConfigExt::to_dict(&plugin);
/// assert_eq!(CustomValue::to_dict(&plugin), Value::Object(payload));
/// ```
pub trait VersionedConfigExt: VersionedConfig {
    /// Builds a config from a payload. See [`ConfigSerializer::from_dict`].
    fn from_dict(payload: Payload) -> Result<Self> {
        ConfigSerializer::<Self>::new()?.from_dict(payload)
    }

    /// Converts the config to a payload stamped with the current version.
    fn to_dict(&self) -> Payload {
        ConfigSerializer::<Self>::dict_of(self, &SaveOptions::default())
    }

    /// Builds a config from JSON text. See [`ConfigSerializer::from_json`].
    fn from_json(text: &str) -> Result<Self> {
        ConfigSerializer::<Self>::new()?.from_json(text)
    }

    /// Encodes the config as compact JSON.
    fn to_json(&self) -> Result<String> {
        ConfigSerializer::<Self>::new()?.to_json(self)
    }

    /// Encodes the config as JSON indented by `indent` spaces per level.
    fn to_json_pretty(&self, indent: usize) -> Result<String> {
        ConfigSerializer::<Self>::new()?.to_json_with(self, &SaveOptions::new().indent(indent))
    }

    /// Reads a config from a file. See [`ConfigSerializer::from_file`].
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        ConfigSerializer::<Self>::new()?.from_file(path)
    }

    /// Writes the config to a file. See [`ConfigSerializer::to_file`].
    fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        ConfigSerializer::<Self>::new()?.to_file(self, path)
    }
}

impl<C: VersionedConfig> VersionedConfigExt for C {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigError, CustomValue, Fields, VersionTag};
    use crate::migration::MigrationRegistry;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[derive(Debug, PartialEq)]
    struct Greeting {
        text: String,
    }

    impl VersionedConfig for Greeting {
        const VERSION_KEY: &'static str = "schema";

        fn version() -> VersionTag {
            VersionTag::parse("2.1").unwrap()
        }

        fn to_fields(&self) -> Payload {
            let mut payload = Payload::new();
            payload.insert("text".into(), self.text.to_dict());
            payload
        }

        fn from_fields(fields: &Fields<'_>) -> Result<Self> {
            Ok(Greeting {
                text: fields.required("text")?,
            })
        }

        fn register_migrations(registry: &mut MigrationRegistry) -> Result<()> {
            registry.add_step(VersionTag::parse("2.0")?, VersionTag::parse("2.1")?, |mut p| {
                if let Some(msg) = p.remove("message") {
                    p.insert("text".into(), msg);
                }
                p
            })
        }
    }

    #[test]
    fn test_to_dict_uses_custom_version_key() {
        let greeting = Greeting {
            text: "hi".into(),
        };
        assert_eq!(
            Value::Object(greeting.to_dict()),
            json!({"schema": "2.1", "text": "hi"})
        );
    }

    #[test]
    fn test_from_dict_migrates() {
        let payload = json!({"schema": "2.0", "message": "hello"})
            .as_object()
            .cloned()
            .unwrap();
        let greeting = Greeting::from_dict(payload).unwrap();
        assert_eq!(greeting.text, "hello");
    }

    #[test]
    fn test_json_shorthands() {
        let greeting = Greeting {
            text: "hey".into(),
        };
        let text = greeting.to_json().unwrap();
        assert_eq!(Greeting::from_json(&text).unwrap(), greeting);
        assert!(greeting.to_json_pretty(2).unwrap().contains("\n  \"text\": \"hey\""));
    }

    #[test]
    fn test_file_shorthands() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("greeting.json");
        let greeting = Greeting {
            text: "file".into(),
        };
        greeting.to_file(&path).unwrap();
        assert_eq!(Greeting::from_file(&path).unwrap(), greeting);
    }

    /// A config that is also stored as a field of `Outer`.
    #[derive(Debug, Clone, PartialEq)]
    struct Inner {
        level: u8,
    }

    impl VersionedConfig for Inner {
        fn version() -> VersionTag {
            VersionTag::from(2)
        }

        fn to_fields(&self) -> Payload {
            let mut payload = Payload::new();
            payload.insert("level".into(), CustomValue::to_dict(&self.level));
            payload
        }

        fn from_fields(fields: &Fields<'_>) -> Result<Self> {
            Ok(Inner {
                level: fields.required("level")?,
            })
        }

        fn register_migrations(registry: &mut MigrationRegistry) -> Result<()> {
            registry.add_step(1, 2, |mut p| {
                p.insert("level".into(), json!(1));
                p
            })
        }
    }

    impl CustomValue for Inner {
        fn to_dict(&self) -> Value {
            Value::Object(VersionedConfigExt::to_dict(self))
        }

        fn from_dict(value: &Value) -> Result<Self> {
            let payload = value
                .as_object()
                .cloned()
                .ok_or_else(|| ConfigError::deserialization::<Self>("expected an object"))?;
            <Self as VersionedConfigExt>::from_dict(payload)
        }
    }

    #[derive(Debug, PartialEq)]
    struct Outer {
        inner: Inner,
    }

    impl VersionedConfig for Outer {
        fn version() -> VersionTag {
            VersionTag::from(1)
        }

        fn to_fields(&self) -> Payload {
            let mut payload = Payload::new();
            payload.insert("inner".into(), CustomValue::to_dict(&self.inner));
            payload
        }

        fn from_fields(fields: &Fields<'_>) -> Result<Self> {
            Ok(Outer {
                inner: fields.required("inner")?,
            })
        }
    }

    #[test]
    fn test_nested_config_uses_qualified_calls() {
        let outer = Outer {
            inner: Inner { level: 4 },
        };
        assert_eq!(
            Value::Object(outer.to_dict()),
            json!({"version": 1, "inner": {"version": 2, "level": 4}})
        );
        assert_eq!(
            CustomValue::to_dict(&outer.inner),
            Value::Object(VersionedConfigExt::to_dict(&outer.inner))
        );

        // the nested config migrates on its own
        let old = json!({"version": 1, "inner": {"version": 1}})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(
            Outer::from_dict(old).unwrap(),
            Outer {
                inner: Inner { level: 1 }
            }
        );
    }
}
