// SPDX-License-Identifier: MIT OR Apache-2.0

//! Version migration example for the vercfg crate.
//!
//! This example demonstrates:
//! - Registering a chain of migrations for a schema at version 3
//! - Loading payloads written by every older version
//! - Inspecting the migration report
//! - The errors raised for future and stranded versions
//!
//! To run this example:
//! ```bash
//! cargo run --example version_migration
//! ```

use serde_json::json;
use vercfg::prelude::*;
use vercfg::versioned_config;

fn migrations(registry: &mut MigrationRegistry) -> Result<()> {
    // v1 stored a single "address" string as "host:port"
    registry.add_step(1, 2, |mut payload| {
        let address = payload
            .remove("address")
            .and_then(|a| a.as_str().map(str::to_string))
            .unwrap_or_default();
        let (host, port) = address.split_once(':').unwrap_or((address.as_str(), "80"));
        payload.insert("host".into(), json!(host));
        payload.insert("port".into(), json!(port.parse::<u16>().unwrap_or(80)));
        payload
    })?;

    // v2 had no TLS flag
    registry.add_step(2, 3, |mut payload| {
        let port = payload.get("port").and_then(|p| p.as_u64()).unwrap_or(80);
        payload.insert("tls".into(), json!(port == 443));
        payload
    })
}

versioned_config! {
    /// Connection settings, now at version 3.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Connection {
        @version = 3;
        @migrations = migrations;
        pub host: String = "localhost".to_string(),
        pub port: u16 = 80,
        pub tls: bool = false,
    }
}

fn main() -> Result<()> {
    // Debug level shows every migration step
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== vercfg: Version Migration ===\n");

    let serializer = ConfigSerializer::<Connection>::new()?;
    println!("Registry: {:?}\n", serializer.registry());

    let saved = [
        r#"{"version": 1, "address": "example.org:443"}"#,
        r#"{"version": 2, "host": "internal", "port": 8080}"#,
        r#"{"version": 3, "host": "current", "port": 9000, "tls": true}"#,
    ];

    for text in saved {
        println!("--- Loading {} ---", text);
        let mut connection = Connection::default();
        match serializer.load_json(text, &mut connection, &LoadOptions::default())? {
            Some(report) => println!(
                "✓ Migrated {} -> {} in {} step(s)",
                report.from,
                report.to,
                report.len()
            ),
            None => println!("✓ Already current"),
        }
        println!("  {:?}", connection);
        println!("  Saved as {}\n", serializer.to_json(&connection)?);
    }

    println!("--- Error Cases ---");
    for text in [
        r#"{"version": 99}"#,
        r#"{"version": 0}"#,
        r#"{"host": "no-version"}"#,
    ] {
        match serializer.from_json(text) {
            Ok(connection) => println!("? Unexpectedly loaded {:?}", connection),
            Err(e) => println!("✗ {} -> {}", text, e),
        }
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
