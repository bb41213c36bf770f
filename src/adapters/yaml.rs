// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML payload codec adapter.
//!
//! YAML documents are read straight into the same JSON data model the rest of
//! the crate uses, so migrations and custom values never see a difference.

use crate::domain::{into_payload, ConfigError, Payload, Result};
use crate::ports::PayloadCodec;
use serde_json::Value;

/// YAML codec implementation.
///
/// YAML has no single-line form, so the indent argument to `encode` is ignored.
///
/// # Examples
///
/// ```rust
/// use vercfg::adapters::YamlCodec;
/// use vercfg::ports::PayloadCodec;
///
/// let codec = YamlCodec::new();
/// let payload = codec.decode("version: 1\ndatabase:\n  host: localhost\n").unwrap();
/// assert_eq!(payload["database"]["host"], "localhost");
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlCodec;

impl YamlCodec {
    /// Creates a new YAML codec.
    pub fn new() -> Self {
        YamlCodec
    }
}

impl PayloadCodec for YamlCodec {
    fn name(&self) -> &str {
        "yaml"
    }

    fn decode(&self, content: &str) -> Result<Payload> {
        let value: Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::parse("YAML", e))?;
        into_payload(value)
    }

    fn encode(&self, payload: &Payload, _indent: Option<usize>) -> Result<String> {
        serde_yaml::to_string(payload).map_err(|e| ConfigError::encode("YAML", e))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
