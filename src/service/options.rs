// SPDX-License-Identifier: MIT OR Apache-2.0

//! Load and save options.

use crate::domain::{FieldFilter, Result};

/// Options for loading a payload into an existing config instance.
///
/// By default loads are validated: every field must be present and no
/// unrecognized field may appear. With validation off, missing fields keep the
/// instance's current values and unrecognized fields are dropped with a warning.
///
/// # Examples
///
/// ```rust
/// use vercfg::service::LoadOptions;
///
/// # fn main() -> vercfg::domain::Result<()> {
/// let options = LoadOptions::new()
///     .validate(false)
///     .with_filters(["database"], Vec::<String>::new())?;
/// assert!(!options.is_validating());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    validate: bool,
    filter: FieldFilter,
}

impl LoadOptions {
    /// Creates validated options that load every field.
    pub fn new() -> Self {
        Self {
            validate: true,
            filter: FieldFilter::All,
        }
    }

    /// Turns missing/unrecognized field checks on or off.
    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Sets the field filter.
    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Loads only the given dotted field paths.
    pub fn only<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter(FieldFilter::only(paths))
    }

    /// Loads every field except the given dotted field paths.
    pub fn ignore<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter(FieldFilter::ignore(paths))
    }

    /// Sets the filter from separate `only` and `ignore` lists.
    ///
    /// # Errors
    ///
    /// `InvalidFilter` if both lists are non-empty.
    pub fn with_filters<I, J, S, T>(self, only: I, ignore: J) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Ok(self.filter(FieldFilter::new(only, ignore)?))
    }

    /// Returns true if missing and unrecognized fields are errors.
    pub fn is_validating(&self) -> bool {
        self.validate
    }

    /// Returns the field filter.
    pub fn field_filter(&self) -> &FieldFilter {
        &self.filter
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for encoding a config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOptions {
    indent: Option<usize>,
    filter: FieldFilter,
}

impl SaveOptions {
    /// Creates options for compact output of every field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests pretty output indented by `width` spaces per level.
    pub fn indent(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }

    /// Requests compact output.
    pub fn compact(mut self) -> Self {
        self.indent = None;
        self
    }

    /// Sets the field filter.
    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Saves only the given dotted field paths.
    pub fn only<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter(FieldFilter::only(paths))
    }

    /// Saves every field except the given dotted field paths.
    pub fn ignore<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter(FieldFilter::ignore(paths))
    }

    /// Sets the filter from separate `only` and `ignore` lists.
    ///
    /// # Errors
    ///
    /// `InvalidFilter` if both lists are non-empty.
    pub fn with_filters<I, J, S, T>(self, only: I, ignore: J) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Ok(self.filter(FieldFilter::new(only, ignore)?))
    }

    /// Returns the requested indent width, `None` for compact output.
    pub fn indent_width(&self) -> Option<usize> {
        self.indent
    }

    /// Returns the field filter.
    pub fn field_filter(&self) -> &FieldFilter {
        &self.filter
    }
}
