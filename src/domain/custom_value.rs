// SPDX-License-Identifier: MIT OR Apache-2.0

//! The custom value protocol.
//!
//! Every value stored in a configuration field goes through [`CustomValue`]: it
//! turns itself into plain JSON data with `to_dict` and is rebuilt from that data
//! with `from_dict`. Scalars go through `serde`, and any `serde` type can opt in
//! with [`serde_custom_value!`](crate::serde_custom_value). Containers implement the
//! protocol element by element, so user types nest inside a configuration at any
//! depth.

use crate::domain::errors::{short_type_name, ConfigError, Result};
use serde::de::{Deserialize, DeserializeOwned};
use serde::Serialize;
use serde_json::Map;
use std::collections::{BTreeMap, HashMap};

pub use serde_json::Value;

/// A value that can convert itself to and from plain JSON data.
///
/// `to_dict` must produce data with no remaining custom instances, so
/// implementations call `to_dict` on their own nested values. `from_dict` must
/// check the shape of its input and fail with
/// [`ConfigError::Deserialization`] rather than guess.
///
/// Most implementations produce a JSON object, but any plain value is allowed.
///
/// # Examples
///
/// ```
/// use vercfg::domain::{ConfigError, CustomValue, Fields, Result};
/// use serde_json::{json, Value};
///
/// #[derive(Debug, PartialEq)]
/// struct Endpoint {
///     host: String,
///     port: u16,
/// }
///
/// impl CustomValue for Endpoint {
///     fn to_dict(&self) -> Value {
///         json!({"host": self.host.to_dict(), "port": self.port.to_dict()})
///     }
///
///     fn from_dict(value: &Value) -> Result<Self> {
///         let fields = Fields::for_value::<Self>(value)?;
///         Ok(Endpoint {
///             host: fields.required("host")?,
///             port: fields.required("port")?,
///         })
///     }
/// }
///
/// let endpoint = Endpoint { host: "localhost".into(), port: 8080 };
/// assert_eq!(Endpoint::from_dict(&endpoint.to_dict()).unwrap(), endpoint);
/// assert!(matches!(
///     Endpoint::from_dict(&json!({"host": "localhost"})),
///     Err(ConfigError::Deserialization { .. })
/// ));
/// ```
pub trait CustomValue: Sized {
    /// Converts the value to plain JSON data.
    fn to_dict(&self) -> Value;

    /// Rebuilds a value from plain JSON data.
    fn from_dict(value: &Value) -> Result<Self>;
}

/// Returns a short name for the JSON shape of a value, used in error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn shape_mismatch(expected: &str, value: &Value) -> ConfigError {
    ConfigError::TypeMismatch {
        expected: expected.to_string(),
        found: json_kind(value),
        message: format!("expected {}, found {}", expected, json_kind(value)),
    }
}

/// Converts any `serde` value to plain JSON data.
///
/// Values with no JSON form, such as maps with non-string keys, become `null`
/// and a warning is logged.
pub fn to_plain_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::warn!(
            type_name = short_type_name::<T>(),
            error = %e,
            "value has no plain JSON form"
        );
        Value::Null
    })
}

/// Decodes any `serde` value from plain JSON data.
///
/// # Errors
///
/// `TypeMismatch` naming the expected type. [`Fields`](crate::domain::Fields)
/// adds the field context.
pub fn from_plain_value<T: DeserializeOwned>(value: &Value) -> Result<T> {
    <T as Deserialize>::deserialize(value).map_err(|e| ConfigError::TypeMismatch {
        expected: short_type_name::<T>().to_string(),
        found: json_kind(value),
        message: e.to_string(),
    })
}

impl CustomValue for Value {
    fn to_dict(&self) -> Value {
        self.clone()
    }

    fn from_dict(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

crate::serde_custom_value!(
    bool, String, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
);

impl<T: CustomValue> CustomValue for Option<T> {
    fn to_dict(&self) -> Value {
        match self {
            Some(inner) => inner.to_dict(),
            None => Value::Null,
        }
    }

    fn from_dict(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_dict(other).map(Some),
        }
    }
}

impl<T: CustomValue> CustomValue for Vec<T> {
    fn to_dict(&self) -> Value {
        Value::Array(self.iter().map(CustomValue::to_dict).collect())
    }

    fn from_dict(value: &Value) -> Result<Self> {
        value
            .as_array()
            .ok_or_else(|| shape_mismatch("array", value))?
            .iter()
            .map(T::from_dict)
            .collect()
    }
}

impl<T: CustomValue> CustomValue for BTreeMap<String, T> {
    fn to_dict(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_dict()))
                .collect::<Map<String, Value>>(),
        )
    }

    fn from_dict(value: &Value) -> Result<Self> {
        value
            .as_object()
            .ok_or_else(|| shape_mismatch("object", value))?
            .iter()
            .map(|(k, v)| Ok((k.clone(), T::from_dict(v)?)))
            .collect()
    }
}

impl<T: CustomValue> CustomValue for HashMap<String, T> {
    fn to_dict(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_dict()))
                .collect::<Map<String, Value>>(),
        )
    }

    fn from_dict(value: &Value) -> Result<Self> {
        value
            .as_object()
            .ok_or_else(|| shape_mismatch("object", value))?
            .iter()
            .map(|(k, v)| Ok((k.clone(), T::from_dict(v)?)))
            .collect()
    }
}
