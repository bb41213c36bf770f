// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payload type and typed field access.
//!
//! A [`Payload`] is the plain mapping form of a configuration. [`Fields`] wraps a
//! payload (or a nested mapping inside one) and reads typed values out of it,
//! reporting failures in the vocabulary of its context: a config payload reports
//! `SchemaMismatch`, a custom value reports `Deserialization`.

use crate::domain::custom_value::{from_plain_value, json_kind, CustomValue};
use crate::domain::errors::{short_type_name, ConfigError, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::BTreeSet;

/// The plain mapping representation of a configuration.
pub type Payload = Map<String, Value>;

#[derive(Clone, Debug)]
enum Context {
    /// Top-level fields of a config, with the dotted prefix of nested reads.
    Config { prefix: String },
    /// Keys of a custom value being reconstructed.
    Value { type_name: String },
}

/// Typed reader over the keys of a mapping.
///
/// `Fields` records which keys were read, so the loader can reject keys that no
/// field consumed.
///
/// # Examples
///
/// ```
/// use vercfg::domain::{Fields, Payload};
/// use serde_json::json;
///
/// let payload: Payload = json!({"name": "jill", "score": 1001})
///     .as_object()
///     .cloned()
///     .unwrap();
/// let fields = Fields::for_config(&payload);
///
/// let name: String = fields.required("name").unwrap();
/// let score: i64 = fields.required("score").unwrap();
/// let level: i64 = fields.optional("level").unwrap().unwrap_or(1);
/// assert_eq!((name.as_str(), score, level), ("jill", 1001, 1));
/// ```
#[derive(Debug)]
pub struct Fields<'a> {
    map: &'a Payload,
    context: Context,
    skip: Option<&'a str>,
    seen: RefCell<BTreeSet<String>>,
}

impl<'a> Fields<'a> {
    /// Creates a reader over the top-level fields of a config payload.
    pub fn for_config(map: &'a Payload) -> Self {
        Self::new(
            map,
            Context::Config {
                prefix: String::new(),
            },
        )
    }

    /// Creates a reader over the keys of the custom value `T`.
    ///
    /// Fails with `Deserialization` if `value` is not a mapping.
    pub fn for_value<T: ?Sized>(value: &'a Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            ConfigError::deserialization::<T>(format!(
                "expected an object, found {}",
                json_kind(value)
            ))
        })?;
        Ok(Self::new(
            map,
            Context::Value {
                type_name: short_type_name::<T>().to_string(),
            },
        ))
    }

    fn new(map: &'a Payload, context: Context) -> Self {
        Self {
            map,
            context,
            skip: None,
            seen: RefCell::new(BTreeSet::new()),
        }
    }

    /// Excludes a reserved key, such as the version key, from the unused-key check.
    pub(crate) fn skipping(mut self, key: &'a str) -> Self {
        self.skip = Some(key);
        self
    }

    /// Returns the underlying mapping.
    pub fn as_map(&self) -> &'a Payload {
        self.map
    }

    /// Returns true if the key is present.
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Reads a key that must be present.
    pub fn required<T: CustomValue>(&self, name: &str) -> Result<T> {
        match self.map.get(name) {
            Some(value) => self.decode(name, value),
            None => Err(self.missing(name)),
        }
    }

    /// Reads a key that may be absent or null.
    pub fn optional<T: CustomValue>(&self, name: &str) -> Result<Option<T>> {
        match self.map.get(name) {
            None | Some(Value::Null) => {
                self.mark(name);
                Ok(None)
            }
            Some(value) => self.decode(name, value).map(Some),
        }
    }

    /// Reads a key that must be present into any `serde` deserializable type.
    ///
    /// Decoding failures are reported like those of [`required`](Self::required).
    pub fn deserialize<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        match self.map.get(name) {
            Some(value) => {
                self.mark(name);
                from_plain_value(value).map_err(|e| self.wrong_shape(name, e))
            }
            None => Err(self.missing(name)),
        }
    }

    /// Reads a key, falling back to `default` when it is absent.
    pub fn or_default<T: CustomValue>(&self, name: &str, default: T) -> Result<T> {
        Ok(self.optional(name)?.unwrap_or(default))
    }

    /// Opens a nested mapping as a reader in the same context.
    ///
    /// Config readers extend the dotted field path, so errors point at
    /// `outer.inner`.
    pub fn nested(&self, name: &str) -> Result<Fields<'a>> {
        let value = self.map.get(name).ok_or_else(|| self.missing(name))?;
        let map = value.as_object().ok_or_else(|| {
            self.wrong_shape(
                name,
                ConfigError::TypeMismatch {
                    expected: "object".to_string(),
                    found: json_kind(value),
                    message: format!("expected an object, found {}", json_kind(value)),
                },
            )
        })?;
        self.mark(name);
        let context = match &self.context {
            Context::Config { .. } => Context::Config {
                prefix: self.path(name),
            },
            other => other.clone(),
        };
        Ok(Fields::new(map, context))
    }

    /// Returns the keys that no read has consumed, in sorted order.
    pub fn unused(&self) -> Vec<String> {
        let seen = self.seen.borrow();
        self.map
            .keys()
            .filter(|k| Some(k.as_str()) != self.skip && !seen.contains(*k))
            .cloned()
            .collect()
    }

    /// Fails if any key was not consumed.
    pub fn deny_unknown(&self) -> Result<()> {
        match self.unused().first() {
            None => Ok(()),
            Some(name) => Err(match &self.context {
                Context::Config { .. } => {
                    ConfigError::schema_mismatch(self.path(name), "unrecognized field")
                }
                Context::Value { type_name } => ConfigError::Deserialization {
                    type_name: type_name.clone(),
                    message: format!("unrecognized key '{}'", name),
                },
            }),
        }
    }

    fn decode<T: CustomValue>(&self, name: &str, value: &Value) -> Result<T> {
        self.mark(name);
        T::from_dict(value).map_err(|e| self.wrong_shape(name, e))
    }

    fn mark(&self, name: &str) {
        self.seen.borrow_mut().insert(name.to_string());
    }

    fn path(&self, name: &str) -> String {
        match &self.context {
            Context::Config { prefix } if !prefix.is_empty() => format!("{}.{}", prefix, name),
            _ => name.to_string(),
        }
    }

    fn missing(&self, name: &str) -> ConfigError {
        match &self.context {
            Context::Config { .. } => ConfigError::schema_mismatch(self.path(name), "missing field"),
            Context::Value { type_name } => ConfigError::Deserialization {
                type_name: type_name.clone(),
                message: format!("missing key '{}'", name),
            },
        }
    }

    /// Attaches field context to plain-shape errors. Errors raised by nested custom
    /// values already name their type and pass through unchanged.
    fn wrong_shape(&self, name: &str, err: ConfigError) -> ConfigError {
        match (err, &self.context) {
            (ConfigError::TypeMismatch { message, .. }, Context::Config { .. }) => {
                ConfigError::schema_mismatch(self.path(name), message)
            }
            (ConfigError::TypeMismatch { message, .. }, Context::Value { type_name }) => {
                ConfigError::Deserialization {
                    type_name: type_name.clone(),
                    message: format!("key '{}': {}", name, message),
                }
            }
            (other, _) => other,
        }
    }
}

/// Converts a JSON value that must be a mapping into a payload.
pub fn into_payload(value: Value) -> Result<Payload> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ConfigError::Parse {
            message: format!(
                "Configuration payload must be an object, found {}",
                json_kind(&other)
            ),
            source: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_required_present() {
        let p = payload(json!({"host": "localhost", "port": 5432}));
        let fields = Fields::for_config(&p);
        assert_eq!(fields.required::<String>("host").unwrap(), "localhost");
        assert_eq!(fields.required::<u16>("port").unwrap(), 5432);
    }

    #[test]
    fn test_required_missing_in_config_is_schema_mismatch() {
        let p = payload(json!({}));
        let fields = Fields::for_config(&p);
        let err = fields.required::<String>("host").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SchemaMismatch { ref field, .. } if field == "host"
        ));
    }

    #[test]
    fn test_wrong_shape_in_config_is_schema_mismatch() {
        let p = payload(json!({"port": "not a number"}));
        let fields = Fields::for_config(&p);
        let err = fields.required::<u16>("port").unwrap_err();
        assert!(matches!(err, ConfigError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("expected"));
    }

    #[test]
    fn test_missing_in_value_is_deserialization() {
        struct Endpoint;
        let v = json!({"host": "localhost"});
        let fields = Fields::for_value::<Endpoint>(&v).unwrap();
        let err = fields.required::<u16>("port").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Deserialization { ref type_name, .. } if type_name == "Endpoint"
        ));
    }

    #[test]
    fn test_for_value_rejects_non_object() {
        struct Endpoint;
        let v = json!([1, 2]);
        let err = Fields::for_value::<Endpoint>(&v).unwrap_err();
        assert!(matches!(err, ConfigError::Deserialization { .. }));
    }

    #[test]
    fn test_optional_and_default() {
        let p = payload(json!({"a": null, "b": 2}));
        let fields = Fields::for_config(&p);
        assert_eq!(fields.optional::<i64>("a").unwrap(), None);
        assert_eq!(fields.optional::<i64>("b").unwrap(), Some(2));
        assert_eq!(fields.or_default::<i64>("c", 9).unwrap(), 9);
    }

    #[test]
    fn test_nested_paths_in_errors() {
        let p = payload(json!({"database": {"host": 5}}));
        let fields = Fields::for_config(&p);
        let db = fields.nested("database").unwrap();
        let err = db.required::<String>("host").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SchemaMismatch { ref field, .. } if field == "database.host"
        ));
    }

    #[test]
    fn test_unused_and_deny_unknown() {
        let p = payload(json!({"version": 1, "a": 1, "b": 2}));
        let fields = Fields::for_config(&p).skipping("version");
        let _: i64 = fields.required("a").unwrap();
        assert_eq!(fields.unused(), vec!["b".to_string()]);
        let err = fields.deny_unknown().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SchemaMismatch { ref field, .. } if field == "b"
        ));

        let _: i64 = fields.required("b").unwrap();
        assert!(fields.deny_unknown().is_ok());
    }

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Limits {
        max_connections: u32,
        burst: Option<u32>,
    }

    #[test]
    fn test_deserialize_serde_type() {
        let p = payload(json!({"limits": {"max_connections": 10, "burst": null}}));
        let fields = Fields::for_config(&p);
        let limits: Limits = fields.deserialize("limits").unwrap();
        assert_eq!(
            limits,
            Limits {
                max_connections: 10,
                burst: None
            }
        );
        assert!(fields.deny_unknown().is_ok());
    }

    #[test]
    fn test_deserialize_errors_carry_field_context() {
        let p = payload(json!({"limits": {"max_connections": -1}}));
        let fields = Fields::for_config(&p);
        let err = fields.deserialize::<Limits>("limits").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SchemaMismatch { ref field, .. } if field == "limits"
        ));
        assert!(matches!(
            fields.deserialize::<Limits>("absent"),
            Err(ConfigError::SchemaMismatch { .. })
        ));

        struct Gateway;
        let v = json!({"limits": "many"});
        let fields = Fields::for_value::<Gateway>(&v).unwrap();
        let err = fields.deserialize::<Limits>("limits").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Deserialization { ref type_name, ref message }
                if type_name == "Gateway" && message.starts_with("key 'limits'")
        ));
    }

    #[test]
    fn test_into_payload() {
        assert!(into_payload(json!({"a": 1})).is_ok());
        assert!(matches!(
            into_payload(json!([1])),
            Err(ConfigError::Parse { .. })
        ));
    }
}
