// SPDX-License-Identifier: MIT OR Apache-2.0

//! Version tag type.
//!
//! A [`VersionTag`] marks the schema revision a payload was written with. Tags are
//! either plain integers (`3`) or dotted numeric strings (`"1.0.1"`), and both forms
//! compare component-wise so a schema can mix them while it moves from one style
//! to the other.

use crate::domain::errors::{ConfigError, Result};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// An ordered identifier for a configuration schema revision.
///
/// Integer tags serialize as JSON numbers and dotted tags as JSON strings, so a
/// payload always keeps the style its schema declared. Ordering treats an integer
/// `n` as the single component `n`, and missing trailing components as zero.
///
/// # Examples
///
/// ```
/// use vercfg::domain::VersionTag;
///
/// let old = VersionTag::parse("1.0.0").unwrap();
/// let new = VersionTag::parse("1.0.1").unwrap();
/// assert!(old < new);
///
/// assert_eq!(VersionTag::from(2), VersionTag::parse("2.0").unwrap());
/// ```
///
/// Integer tags come only from `u64`, so a negative literal does not compile:
///
/// ```compile_fail
/// use vercfg::domain::VersionTag;
///
/// let tag = VersionTag::from(-1);
/// ```
#[derive(Clone, Debug)]
pub enum VersionTag {
    /// A plain integer version such as `3`.
    Number(u64),
    /// A dotted version such as `"1.0.1"`.
    Dotted(Vec<u64>),
}

impl VersionTag {
    /// Parses a dotted version string.
    ///
    /// Every dot-separated component must be an unsigned integer.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |message: String| ConfigError::InvalidVersion {
            value: format!("\"{}\"", text),
            message,
        };

        if text.trim().is_empty() {
            return Err(invalid("version string is empty".to_string()));
        }

        let components = text
            .split('.')
            .map(|part| {
                part.trim()
                    .parse::<u64>()
                    .map_err(|e| invalid(format!("component '{}' is not a number: {}", part, e)))
            })
            .collect::<Result<Vec<u64>>>()?;

        Ok(VersionTag::Dotted(components))
    }

    /// Reads a version tag from the JSON value stored under the version key.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(VersionTag::Number).ok_or_else(|| {
                ConfigError::InvalidVersion {
                    value: value.to_string(),
                    message: "numeric versions must be non-negative integers".to_string(),
                }
            }),
            Value::String(s) => Self::parse(s),
            other => Err(ConfigError::InvalidVersion {
                value: other.to_string(),
                message: "expected a number or a dotted version string".to_string(),
            }),
        }
    }

    /// Converts the tag into the JSON value written under the version key.
    pub fn to_value(&self) -> Value {
        match self {
            VersionTag::Number(n) => Value::from(*n),
            VersionTag::Dotted(_) => Value::String(self.to_string()),
        }
    }

    /// Returns the numeric components of the tag.
    pub fn components(&self) -> &[u64] {
        match self {
            VersionTag::Number(n) => std::slice::from_ref(n),
            VersionTag::Dotted(parts) => parts,
        }
    }

    fn significant(&self) -> &[u64] {
        let parts = self.components();
        let end = parts.iter().rposition(|c| *c != 0).map_or(0, |i| i + 1);
        &parts[..end]
    }
}

impl PartialEq for VersionTag {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionTag {}

impl PartialOrd for VersionTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionTag {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.components(), other.components());
        let len = a.len().max(b.len());
        (0..len)
            .map(|i| {
                let x = a.get(i).copied().unwrap_or(0);
                let y = b.get(i).copied().unwrap_or(0);
                x.cmp(&y)
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl Hash for VersionTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl From<u64> for VersionTag {
    fn from(n: u64) -> Self {
        VersionTag::Number(n)
    }
}


impl<const N: usize> From<[u64; N]> for VersionTag {
    /// Builds a dotted tag, `[1, 0, 1]` is `"1.0.1"`.
    fn from(parts: [u64; N]) -> Self {
        VersionTag::Dotted(parts.to_vec())
    }
}

impl FromStr for VersionTag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionTag::Number(n) => write!(f, "{}", n),
            VersionTag::Dotted(parts) => {
                let text = parts
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(".");
                write!(f, "{}", text)
            }
        }
    }
}

impl Serialize for VersionTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            VersionTag::Number(n) => serializer.serialize_u64(*n),
            VersionTag::Dotted(_) => serializer.collect_str(self),
        }
    }
}
