// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the vercfg crate.
//!
//! This example demonstrates:
//! - Declaring a versioned config with default values
//! - Saving it as JSON (compact and pretty) and YAML
//! - Loading it back from text and from files
//! - Editing a file in place with `FileLoader`
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage
//! ```

use vercfg::prelude::*;
use vercfg::versioned_config;

versioned_config! {
    /// Settings for a small web service.
    #[derive(Debug, Clone, PartialEq)]
    pub struct AppSettings {
        @version = 1;
        pub app_name: String = "MyApplication".to_string(),
        pub port: u16 = 8080,
        pub debug: bool = false,
        pub timeout_secs: f64 = 30.5,
        pub allowed_hosts: Vec<String> = vec!["localhost".to_string()],
    }
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== vercfg: Basic Usage ===\n");

    // Example 1: Defaults and JSON text
    println!("--- Example 1: JSON Text ---");
    let settings = AppSettings::default();
    let compact = settings.to_json()?;
    println!("Compact: {}", compact);
    println!("Pretty:\n{}", settings.to_json_pretty(2)?);

    let parsed = AppSettings::from_json(&compact)?;
    println!("✓ Parsed back equal to original: {}", parsed == settings);

    // Example 2: Files
    println!("\n--- Example 2: Files ---");
    let dir = tempfile::tempdir()?;
    let json_path = dir.path().join("settings.json");
    let yaml_path = dir.path().join("settings.yaml");

    let serializer = ConfigSerializer::<AppSettings>::new()?;
    serializer.to_file_with(&settings, &json_path, &SaveOptions::new().indent(4))?;
    serializer.to_file(&settings, &yaml_path)?;
    println!("✓ Wrote {}", json_path.display());
    println!("✓ Wrote {}", yaml_path.display());

    let from_yaml = serializer.from_file(&yaml_path)?;
    println!("✓ YAML file loads port {}", from_yaml.port);

    // Example 3: Partial saves
    println!("\n--- Example 3: Partial Saves ---");
    let public = serializer.to_json_with(&settings, &SaveOptions::new().only(["app_name", "port"]))?;
    println!("Only public fields: {}", public);

    // Example 4: Editing a file in place
    println!("\n--- Example 4: FileLoader ---");
    let loader = FileLoader::<AppSettings>::new(&json_path)?;
    let port = loader.modify(|s| {
        s.debug = true;
        s.port += 1;
        s.port
    })?;
    println!("✓ Port bumped to {}", port);
    println!("✓ Debug now {}", loader.load()?.debug);

    // Example 5: Default location
    println!("\n--- Example 5: Default Location ---");
    match ConfigSerializer::<AppSettings>::default_path("com.example", "myapp", "settings.json") {
        Ok(path) => println!("Settings would live at {}", path.display()),
        Err(e) => println!("✗ No default location: {}", e),
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
