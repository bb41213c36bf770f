// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Once;
use vercfg::prelude::*;
use vercfg::versioned_config;

static TRACING: Once = Once::new();

/// Installs a test-writer tracing subscriber once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Converts a JSON object literal into a payload.
pub fn payload(value: Value) -> Payload {
    value
        .as_object()
        .cloned()
        .unwrap_or_else(|| panic!("not a JSON object: {}", value))
}

/// A 2D point stored as `{"x": .., "y": ..}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl CustomValue for Point {
    fn to_dict(&self) -> Value {
        json!({"x": self.x, "y": self.y})
    }

    fn from_dict(value: &Value) -> Result<Self> {
        let fields = Fields::for_value::<Self>(value)?;
        let point = Point {
            x: fields.required("x")?,
            y: fields.required("y")?,
        };
        fields.deny_unknown()?;
        Ok(point)
    }
}

/// A named polyline, nesting a list of custom values inside a custom value.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub name: String,
    pub points: Vec<Point>,
    pub closed: Option<bool>,
}

impl CustomValue for Stroke {
    fn to_dict(&self) -> Value {
        json!({
            "name": self.name,
            "points": self.points.to_dict(),
            "closed": self.closed,
        })
    }

    fn from_dict(value: &Value) -> Result<Self> {
        let fields = Fields::for_value::<Self>(value)?;
        Ok(Stroke {
            name: fields.required("name")?,
            points: fields.required("points")?,
            closed: fields.optional("closed")?,
        })
    }
}

/// Registers the three-step chain used across the migration tests:
/// v1 -> v2 adds `y: 0`, v2 -> v3 renames `x` to `value`.
pub fn chain_migrations(registry: &mut MigrationRegistry) -> Result<()> {
    // declared newest first on purpose
    registry.add_step(2, 3, |mut p| {
        if let Some(x) = p.remove("x") {
            p.insert("value".into(), x);
        }
        p
    })?;
    registry.add_step(1, 2, |mut p| {
        p.insert("y".into(), json!(0));
        p
    })
}

versioned_config! {
    /// Schema at version 3 of the migration chain.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ChainConfig {
        @version = 3;
        @migrations = chain_migrations;
        pub value: i64 = 0,
        pub y: i64 = 0,
    }
}

fn user_migrations(registry: &mut MigrationRegistry) -> Result<()> {
    registry.add_step([1, 0, 0], [1, 0, 1], |mut p| {
        p.remove("user_id");
        // the score history collapses to its latest entry
        let latest = p
            .get("score")
            .and_then(|s| s.as_array())
            .map(|s| s.first().cloned().unwrap_or(json!(0)));
        if let Some(latest) = latest {
            p.insert("score".into(), latest);
        }
        p
    })
}

versioned_config! {
    /// A user profile whose 1.0.0 layout kept an id and a score history.
    #[derive(Debug, Clone, PartialEq)]
    pub struct UserConfig {
        @version = [1, 0, 1];
        @migrations = user_migrations;
        pub user_name: String = "john".to_string(),
        pub score: i64 = 0,
    }
}

versioned_config! {
    /// A drawing with nested custom values.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Drawing {
        @version = 1;
        @version_key = "format";
        pub title: String = "untitled".to_string(),
        pub origin: Point = Point { x: 0, y: 0 },
        pub strokes: Vec<Stroke> = Vec::new(),
        pub layers: std::collections::BTreeMap<String, Point> = Default::default(),
    }
}
