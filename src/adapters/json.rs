// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON payload codec adapter.

use crate::domain::{into_payload, ConfigError, Payload, Result};
use crate::ports::PayloadCodec;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// JSON codec implementation.
///
/// Compact output puts the whole payload on one line; an indent width produces
/// pretty output with that many spaces per level.
///
/// # Examples
///
/// ```rust
/// use vercfg::adapters::JsonCodec;
/// use vercfg::ports::PayloadCodec;
///
/// let codec = JsonCodec::new();
/// let payload = codec.decode(r#"{"version": 1, "name": "demo"}"#).unwrap();
/// assert_eq!(codec.encode(&payload, None).unwrap(), r#"{"name":"demo","version":1}"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Creates a new JSON codec.
    pub fn new() -> Self {
        JsonCodec
    }
}

impl PayloadCodec for JsonCodec {
    fn name(&self) -> &str {
        "json"
    }

    fn decode(&self, content: &str) -> Result<Payload> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| ConfigError::parse("JSON", e))?;
        into_payload(value)
    }

    fn encode(&self, payload: &Payload, indent: Option<usize>) -> Result<String> {
        let Some(width) = indent else {
            return serde_json::to_string(payload).map_err(|e| ConfigError::encode("JSON", e));
        };

        let indent = vec![b' '; width];
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
        payload
            .serialize(&mut serializer)
            .map_err(|e| ConfigError::encode("JSON", e))?;
        String::from_utf8(buf).map_err(|e| ConfigError::encode("JSON", e))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}
