// SPDX-License-Identifier: MIT OR Apache-2.0

//! Custom value example for the vercfg crate.
//!
//! This example demonstrates:
//! - Implementing `CustomValue` for a scalar type stored as a string
//! - Implementing `CustomValue` for a structured type using `Fields`
//! - Nesting both inside a versioned config
//! - How invalid data is reported
//!
//! To run this example:
//! ```bash
//! cargo run --example custom_value
//! ```

use serde_json::{json, Value};
use vercfg::prelude::*;
use vercfg::versioned_config;

/// An RGB colour stored as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl CustomValue for Color {
    fn to_dict(&self) -> Value {
        json!(format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b))
    }

    fn from_dict(value: &Value) -> Result<Self> {
        let text = value
            .as_str()
            .ok_or_else(|| ConfigError::deserialization::<Self>("expected a string"))?;
        let hex = text
            .strip_prefix('#')
            .filter(|h| h.len() == 6)
            .ok_or_else(|| ConfigError::deserialization::<Self>(format!("bad colour '{}'", text)))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| ConfigError::deserialization::<Self>(e.to_string()))
        };
        Ok(Color {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

/// A colour theme with named accents.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    background: Color,
    foreground: Color,
    accents: Vec<Color>,
}

impl CustomValue for Theme {
    fn to_dict(&self) -> Value {
        json!({
            "background": self.background.to_dict(),
            "foreground": self.foreground.to_dict(),
            "accents": self.accents.to_dict(),
        })
    }

    fn from_dict(value: &Value) -> Result<Self> {
        let fields = Fields::for_value::<Self>(value)?;
        let theme = Theme {
            background: fields.required("background")?,
            foreground: fields.required("foreground")?,
            accents: fields.or_default("accents", Vec::new())?,
        };
        fields.deny_unknown()?;
        Ok(theme)
    }
}

versioned_config! {
    /// Editor appearance.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Appearance {
        @version = [2, 1];
        pub font_size: u32 = 12,
        pub theme: Theme = Theme {
            background: Color { r: 0x1e, g: 0x1e, b: 0x1e },
            foreground: Color { r: 0xd4, g: 0xd4, b: 0xd4 },
            accents: vec![Color { r: 0x56, g: 0x9c, b: 0xd6 }],
        },
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== vercfg: Custom Values ===\n");

    let appearance = Appearance::default();
    let text = appearance.to_json_pretty(2)?;
    println!("Saved:\n{}\n", text);

    let restored = Appearance::from_json(&text)?;
    println!("✓ Round trip equal: {}\n", restored == appearance);

    println!("--- Invalid Data ---");
    for bad in [
        r##"{"version": "2.1", "font_size": 12, "theme": {"background": "#zzzzzz", "foreground": "#000000"}}"##,
        r##"{"version": "2.1", "font_size": 12, "theme": {"background": "#000000"}}"##,
        r##"{"version": "2.1", "font_size": "big", "theme": {"background": "#000000", "foreground": "#ffffff"}}"##,
    ] {
        match Appearance::from_json(bad) {
            Ok(a) => println!("? Unexpectedly loaded {:?}", a),
            Err(e) => println!("✗ {}", e),
        }
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
