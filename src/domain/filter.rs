// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field filters for partial saves and loads.
//!
//! A filter names fields by dotted path (`database.host`). An entry selects the
//! field it names and everything nested under it. Matching is by whole path
//! segment, so `val` does not select `val1`.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::payload::Payload;
use serde_json::Value;

/// Selects which fields of a payload take part in a save or load.
///
/// # Examples
///
/// ```
/// use vercfg::domain::FieldFilter;
/// use serde_json::json;
///
/// let payload = json!({"a": 1, "db": {"host": "x", "port": 2}})
///     .as_object()
///     .cloned()
///     .unwrap();
///
/// let only = FieldFilter::only(["db.port"]);
/// assert_eq!(serde_json::Value::Object(only.apply(&payload)), json!({"db": {"port": 2}}));
///
/// let ignore = FieldFilter::ignore(["db"]);
/// assert_eq!(serde_json::Value::Object(ignore.apply(&payload)), json!({"a": 1}));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FieldFilter {
    /// Every field takes part.
    #[default]
    All,
    /// Only the listed fields take part.
    Only(Vec<String>),
    /// Every field except the listed ones takes part.
    Ignore(Vec<String>),
}

#[derive(Debug, PartialEq, Eq)]
enum Decision {
    Keep,
    Drop,
    Descend,
}

impl FieldFilter {
    /// Builds a filter from separate `only` and `ignore` lists.
    ///
    /// At most one list may be non-empty; using both is `InvalidFilter`.
    pub fn new<I, J, S, T>(only: I, ignore: J) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let only: Vec<String> = only.into_iter().map(Into::into).collect();
        let ignore: Vec<String> = ignore.into_iter().map(Into::into).collect();
        match (only.is_empty(), ignore.is_empty()) {
            (true, true) => Ok(FieldFilter::All),
            (false, true) => Ok(FieldFilter::Only(only)),
            (true, false) => Ok(FieldFilter::Ignore(ignore)),
            (false, false) => Err(ConfigError::InvalidFilter),
        }
    }

    /// A filter selecting only the given paths.
    pub fn only<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldFilter::Only(paths.into_iter().map(Into::into).collect())
    }

    /// A filter excluding the given paths.
    pub fn ignore<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldFilter::Ignore(paths.into_iter().map(Into::into).collect())
    }

    /// Returns true if the filter selects every field.
    pub fn is_all(&self) -> bool {
        match self {
            FieldFilter::All => true,
            FieldFilter::Only(_) => false,
            FieldFilter::Ignore(paths) => paths.is_empty(),
        }
    }

    /// Returns true if the field at `path` is selected as a whole.
    pub fn selects(&self, path: &str) -> bool {
        self.decide(path) == Decision::Keep
    }

    /// Returns a copy of `payload` holding only the selected fields.
    pub fn apply(&self, payload: &Payload) -> Payload {
        if self.is_all() {
            return payload.clone();
        }
        self.retain(payload, "")
    }

    /// Copies the selected fields of `incoming` over `base`.
    ///
    /// A selected field replaces the value in `base` whole, even when both are
    /// mappings, so keys missing from `incoming` do not survive. Only a field with
    /// a filter entry below it is merged key by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use vercfg::domain::FieldFilter;
    /// use serde_json::json;
    ///
    /// let mut base = json!({"plugins": {"stale": true}, "db": {"host": "a", "port": 1}})
    ///     .as_object()
    ///     .cloned()
    ///     .unwrap();
    /// let incoming = json!({"plugins": {"kept": false}, "db": {"host": "b", "port": 2}})
    ///     .as_object()
    ///     .cloned()
    ///     .unwrap();
    ///
    /// FieldFilter::only(["plugins", "db.port"]).overlay(&mut base, &incoming);
    /// assert_eq!(
    ///     serde_json::Value::Object(base),
    ///     json!({"plugins": {"kept": false}, "db": {"host": "a", "port": 2}})
    /// );
    /// ```
    pub fn overlay(&self, base: &mut Payload, incoming: &Payload) {
        self.overlay_at(base, incoming, "")
    }

    fn overlay_at(&self, base: &mut Payload, incoming: &Payload, prefix: &str) {
        for (key, value) in incoming {
            let path = child_path(prefix, key);
            match (self.decide(&path), value) {
                (Decision::Keep, _) => {
                    base.insert(key.clone(), value.clone());
                }
                (Decision::Drop, _) => {}
                (Decision::Descend, Value::Object(inner)) => {
                    if let Some(Value::Object(existing)) = base.get_mut(key) {
                        self.overlay_at(existing, inner, &path);
                        continue;
                    }
                    let kept = self.retain(inner, &path);
                    if !kept.is_empty() || matches!(self, FieldFilter::Ignore(_)) {
                        base.insert(key.clone(), Value::Object(kept));
                    }
                }
                (Decision::Descend, _) => {
                    if matches!(self, FieldFilter::Ignore(_)) {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
    }

    fn retain(&self, map: &Payload, prefix: &str) -> Payload {
        let mut out = Payload::new();
        for (key, value) in map {
            let path = child_path(prefix, key);
            match (self.decide(&path), value) {
                (Decision::Keep, _) => {
                    out.insert(key.clone(), value.clone());
                }
                (Decision::Drop, _) => {}
                (Decision::Descend, Value::Object(inner)) => {
                    let kept = self.retain(inner, &path);
                    if !kept.is_empty() || matches!(self, FieldFilter::Ignore(_)) {
                        out.insert(key.clone(), Value::Object(kept));
                    }
                }
                (Decision::Descend, _) => {
                    // a path reaching below a leaf
                    if matches!(self, FieldFilter::Ignore(_)) {
                        out.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        out
    }

    fn decide(&self, path: &str) -> Decision {
        match self {
            FieldFilter::All => Decision::Keep,
            FieldFilter::Only(entries) => {
                if entries.iter().any(|e| covers(e, path)) {
                    Decision::Keep
                } else if entries.iter().any(|e| covers(path, e)) {
                    Decision::Descend
                } else {
                    Decision::Drop
                }
            }
            FieldFilter::Ignore(entries) => {
                if entries.iter().any(|e| covers(e, path)) {
                    Decision::Drop
                } else if entries.iter().any(|e| covers(path, e)) {
                    Decision::Descend
                } else {
                    Decision::Keep
                }
            }
        }
    }
}

fn child_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// True if `ancestor` equals `path` or is a whole-segment prefix of it.
fn covers(ancestor: &str, path: &str) -> bool {
    match path.strip_prefix(ancestor) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}
