// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payload codec trait definition.
//!
//! This module defines the `PayloadCodec` trait, which converts payloads to and
//! from a text format (JSON, YAML, ...). File operations pick a codec by the file
//! extension it supports.

use crate::domain::{Payload, Result};

/// A trait for text encodings of configuration payloads.
///
/// # Examples
///
/// ```rust
/// use vercfg::ports::PayloadCodec;
/// use vercfg::domain::{Payload, Result};
///
/// struct NullCodec;
///
/// impl PayloadCodec for NullCodec {
///     fn name(&self) -> &str {
///         "null"
///     }
///
///     fn decode(&self, _content: &str) -> Result<Payload> {
///         Ok(Payload::new())
///     }
///
///     fn encode(&self, _payload: &Payload, _indent: Option<usize>) -> Result<String> {
///         Ok(String::new())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["null"]
///     }
/// }
///
/// let codec = NullCodec;
/// assert!(codec.decode("anything").unwrap().is_empty());
/// assert!(codec.supports_extension("NULL"));
/// ```
pub trait PayloadCodec: Send + Sync {
    /// Returns a short name for the format, used in logs and errors.
    fn name(&self) -> &str;

    /// Decodes text into a payload.
    ///
    /// # Errors
    ///
    /// `Parse` if the text is not valid for the format or is not a mapping.
    fn decode(&self, content: &str) -> Result<Payload>;

    /// Encodes a payload as text.
    ///
    /// `indent` requests pretty output with the given indent width; `None` asks
    /// for the most compact form the format has. Formats without a compact form
    /// may ignore it.
    fn encode(&self, payload: &Payload, indent: Option<usize>) -> Result<String>;

    /// Returns the file extensions (without the leading dot) this codec handles.
    fn supported_extensions(&self) -> &[&str];

    /// Returns true if this codec handles files with the given extension.
    fn supports_extension(&self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Test codec storing a single key per line as `key=value`
    struct LineCodec;

    impl PayloadCodec for LineCodec {
        fn name(&self) -> &str {
            "lines"
        }

        fn decode(&self, content: &str) -> Result<Payload> {
            let mut payload = Payload::new();
            for line in content.lines() {
                if let Some((k, v)) = line.split_once('=') {
                    payload.insert(k.to_string(), json!(v));
                }
            }
            Ok(payload)
        }

        fn encode(&self, payload: &Payload, _indent: Option<usize>) -> Result<String> {
            Ok(payload
                .iter()
                .map(|(k, v)| format!("{}={}", k, v.as_str().unwrap_or_default()))
                .collect::<Vec<_>>()
                .join("\n"))
        }

        fn supported_extensions(&self) -> &[&str] {
            &["lines", "ln"]
        }
    }

    #[test]
    fn test_codec_decode() {
        let payload = LineCodec.decode("a=1\nb=2").unwrap();
        assert_eq!(payload.len(), 2);
        assert_eq!(payload.get("a"), Some(&json!("1")));
    }

    #[test]
    fn test_codec_encode() {
        let mut payload = Payload::new();
        payload.insert("a".to_string(), json!("1"));
        assert_eq!(LineCodec.encode(&payload, None).unwrap(), "a=1");
    }

    #[test]
    fn test_supports_extension_ignores_case() {
        assert!(LineCodec.supports_extension("lines"));
        assert!(LineCodec.supports_extension("LN"));
        assert!(!LineCodec.supports_extension("json"));
    }

    #[test]
    fn test_codec_as_trait_object() {
        let codec: Box<dyn PayloadCodec> = Box::new(LineCodec);
        assert_eq!(codec.name(), "lines");
        assert_eq!(codec.supported_extensions(), &["lines", "ln"]);
    }
}
