// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declaration macro for versioned config structs.

/// Declares a config struct with default field values and a [`VersionedConfig`]
/// implementation.
///
/// The struct also gets a `Default` impl built from the field defaults. Every
/// field type must implement [`CustomValue`]. The header lines set the schema:
///
/// * `@version = <expr>;` anything convertible into a [`VersionTag`], e.g. `3`
///   or `[1, 0, 1]`
/// * `@version_key = "<key>";` optional, replaces the `"version"` key
/// * `@migrations = <path>;` optional, a
///   `fn(&mut MigrationRegistry) -> Result<()>` registering migrations
///
/// # Examples
///
/// ```rust
/// use vercfg::prelude::*;
/// use vercfg::versioned_config;
/// use serde_json::json;
///
/// fn migrations(registry: &mut MigrationRegistry) -> Result<()> {
///     registry.add_step([1, 0, 0], [1, 0, 1], |mut payload| {
///         payload.remove("user_id");
///         payload
///     })
/// }
///
/// versioned_config! {
///     /// Per-user settings.
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct UserConfig {
///         @version = [1, 0, 1];
///         @migrations = migrations;
///         pub user_name: String = "john".to_string(),
///         pub score: i64 = 0,
///     }
/// }
///
/// let config = UserConfig::default();
/// assert_eq!(config.user_name, "john");
///
/// let old = json!({"version": "1.0.0", "user_name": "jill", "user_id": 7, "score": 3});
/// let loaded = UserConfig::from_dict(old.as_object().cloned().unwrap()).unwrap();
/// assert_eq!(loaded, UserConfig { user_name: "jill".into(), score: 3 });
/// ```
///
/// [`VersionedConfig`]: crate::domain::VersionedConfig
/// [`CustomValue`]: crate::domain::CustomValue
/// [`VersionTag`]: crate::domain::VersionTag
#[macro_export]
macro_rules! versioned_config {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            @version = $version:expr;
            $(@version_key = $key:expr;)?
            $(@migrations = $migrations:path;)?
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty = $default:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self {
                    $($field: $default,)*
                }
            }
        }

        impl $crate::domain::VersionedConfig for $name {
            $(const VERSION_KEY: &'static str = $key;)?

            fn version() -> $crate::domain::VersionTag {
                $crate::domain::VersionTag::from($version)
            }

            fn to_fields(&self) -> $crate::domain::Payload {
                let mut payload = $crate::domain::Payload::new();
                $(
                    payload.insert(
                        ::std::string::String::from(stringify!($field)),
                        $crate::domain::CustomValue::to_dict(&self.$field),
                    );
                )*
                payload
            }

            fn from_fields(
                fields: &$crate::domain::Fields<'_>,
            ) -> $crate::domain::Result<Self> {
                ::core::result::Result::Ok(Self {
                    $($field: fields.required(stringify!($field))?,)*
                })
            }

            $(
                fn register_migrations(
                    registry: &mut $crate::migration::MigrationRegistry,
                ) -> $crate::domain::Result<()> {
                    $migrations(registry)
                }
            )?
        }
    };
}

/// Implements [`CustomValue`] for types that already implement `serde`'s
/// `Serialize` and `Deserialize`.
///
/// The value's plain form is whatever `serde_json` produces for it. Decoding
/// failures surface as `TypeMismatch`, which field readers turn into
/// `SchemaMismatch` or `Deserialization`.
///
/// # Examples
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use vercfg::prelude::*;
/// use vercfg::{serde_custom_value, versioned_config};
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// pub struct Retry {
///     pub attempts: u8,
///     pub backoff_ms: u64,
/// }
///
/// serde_custom_value!(Retry);
///
/// versioned_config! {
///     #[derive(Debug, PartialEq)]
///     pub struct ClientConfig {
///         @version = 1;
///         pub retry: Retry = Retry { attempts: 3, backoff_ms: 250 },
///     }
/// }
///
/// let text = r#"{"version": 1, "retry": {"attempts": 5, "backoff_ms": 10}}"#;
/// let config = ClientConfig::from_json(text).unwrap();
/// assert_eq!(config.retry, Retry { attempts: 5, backoff_ms: 10 });
/// ```
///
/// [`CustomValue`]: crate::domain::CustomValue
#[macro_export]
macro_rules! serde_custom_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::domain::CustomValue for $ty {
                fn to_dict(&self) -> $crate::domain::custom_value::Value {
                    $crate::domain::custom_value::to_plain_value(self)
                }

                fn from_dict(
                    value: &$crate::domain::custom_value::Value,
                ) -> $crate::domain::Result<Self> {
                    $crate::domain::custom_value::from_plain_value(value)
                }
            }
        )*
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::{ConfigError, CustomValue, Fields, Payload, Result, VersionTag, VersionedConfig};
    use crate::migration::MigrationRegistry;
    use crate::service::VersionedConfigExt;
    use serde_json::{json, Value};

    #[derive(Debug, Clone, PartialEq)]
    struct Endpoint {
        host: String,
        port: u16,
    }

    impl CustomValue for Endpoint {
        fn to_dict(&self) -> Value {
            json!({"host": self.host, "port": self.port})
        }

        fn from_dict(value: &Value) -> Result<Self> {
            let fields = Fields::for_value::<Self>(value)?;
            Ok(Endpoint {
                host: fields.required("host")?,
                port: fields.required("port")?,
            })
        }
    }

    fn rename_address(registry: &mut MigrationRegistry) -> Result<()> {
        registry.add_step(1, 2, |mut p| {
            if let Some(addr) = p.remove("address") {
                p.insert("endpoint".into(), addr);
            }
            p
        })
    }

    versioned_config! {
        #[derive(Debug, Clone, PartialEq)]
        struct ServiceConfig {
            @version = 2;
            @version_key = "config_version";
            @migrations = rename_address;
            /// Display name
            name: String = "service".to_string(),
            retries: u32 = 3,
            endpoint: Endpoint = Endpoint { host: "localhost".into(), port: 80 },
            tags: Vec<String> = Vec::new(),
            timeout: Option<f64> = None,
        }
    }

    versioned_config! {
        #[derive(Debug, PartialEq)]
        struct Minimal {
            @version = [0, 3];
            enabled: bool = true
        }
    }

    #[test]
    fn test_macro_default() {
        let config = ServiceConfig::default();
        assert_eq!(config.name, "service");
        assert_eq!(config.retries, 3);
        assert_eq!(config.endpoint.port, 80);
        assert!(config.tags.is_empty());
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_macro_schema() {
        assert_eq!(ServiceConfig::VERSION_KEY, "config_version");
        assert_eq!(ServiceConfig::version(), VersionTag::from(2));
        assert_eq!(Minimal::VERSION_KEY, "version");
        assert_eq!(Minimal::version(), VersionTag::parse("0.3").unwrap());
    }

    #[test]
    fn test_macro_to_dict() {
        let dict = ServiceConfig::default().to_dict();
        assert_eq!(
            Value::Object(dict),
            json!({
                "config_version": 2,
                "name": "service",
                "retries": 3,
                "endpoint": {"host": "localhost", "port": 80},
                "tags": [],
                "timeout": null
            })
        );
    }

    #[test]
    fn test_macro_migrations_registered() {
        let payload: Payload = json!({
            "config_version": 1,
            "name": "svc",
            "retries": 5,
            "address": {"host": "db", "port": 5432},
            "tags": ["a"],
            "timeout": 2.5
        })
        .as_object()
        .cloned()
        .unwrap();

        let config = ServiceConfig::from_dict(payload).unwrap();
        assert_eq!(config.endpoint.host, "db");
        assert_eq!(config.tags, vec!["a".to_string()]);
        assert_eq!(config.timeout, Some(2.5));
    }

    #[test]
    fn test_macro_round_trip() {
        let config = Minimal { enabled: false };
        let text = config.to_json().unwrap();
        assert_eq!(text, r#"{"enabled":false,"version":"0.3"}"#);
        assert_eq!(Minimal::from_json(&text).unwrap(), config);
    }

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Backoff {
        initial_ms: u64,
        factor: f64,
    }

    crate::serde_custom_value!(Backoff);

    versioned_config! {
        #[derive(Debug, PartialEq)]
        struct ClientConfig {
            @version = 1;
            backoff: Backoff = Backoff { initial_ms: 100, factor: 2.0 },
            fallbacks: Vec<Backoff> = Vec::new(),
        }
    }

    #[test]
    fn test_macro_serde_field() {
        let text = r#"{"version": 1, "backoff": {"initial_ms": 5, "factor": 1.5}, "fallbacks": []}"#;
        let config = ClientConfig::from_json(text).unwrap();
        assert_eq!(config.backoff, Backoff { initial_ms: 5, factor: 1.5 });

        let result = ClientConfig::from_json(
            r#"{"version": 1, "backoff": {"initial_ms": "soon", "factor": 1.5}, "fallbacks": []}"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::SchemaMismatch { ref field, .. }) if field == "backoff"
        ));
    }

    #[test]
    fn test_macro_missing_field() {
        let result = Minimal::from_json(r#"{"version": "0.3"}"#);
        assert!(matches!(result, Err(ConfigError::SchemaMismatch { .. })));
    }
}
