//! Build script for tornado-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates tornado.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys accepted in `[control]`, with whether they must be integers
const CONTROL_KEYS: &[(&str, bool)] = &[
    ("max_acceleration", false),
    ("pwm_max", true),
    ("speed_increment", false),
    ("debounce_ms", true),
    ("tick_interval_ms", true),
    ("adc_max", true),
    ("status_interval_ms", true),
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate tornado.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=tornado.toml");

    let config_path = Path::new("tornado.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: tornado.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds tornado.toml as its default configuration.  ║\n\
            ║  Please create one in the tornado-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read tornado.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in tornado.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let errors = validate_control(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid [control] section in tornado.toml                ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=tornado.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check the `[control]` table against what the runtime parser accepts
fn validate_control(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let control = match config.get("control") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[control] must be a table".to_string());
            return errors;
        }
        None => {
            errors.push("Missing [control] section".to_string());
            return errors;
        }
    };

    for (key, value) in control {
        let Some((_, integer)) = CONTROL_KEYS.iter().find(|(name, _)| name == key) else {
            errors.push(format!("unknown key '{}'", key));
            continue;
        };

        match value {
            toml::Value::Integer(n) if *integer => {
                let limit = if key == "pwm_max" || key == "adc_max" {
                    u16::MAX as i64
                } else {
                    u32::MAX as i64
                };
                let min = if key == "debounce_ms" { 0 } else { 1 };
                if *n < min || *n > limit {
                    errors.push(format!("'{}' must be {}-{}", key, min, limit));
                }
            }
            toml::Value::Integer(n) if !*integer => {
                if *n <= 0 {
                    errors.push(format!("'{}' must be positive", key));
                }
            }
            toml::Value::Float(f) if !*integer => {
                if !f.is_finite() || *f <= 0.0 {
                    errors.push(format!("'{}' must be positive", key));
                }
            }
            _ => {
                let kind = if *integer { "an integer" } else { "a number" };
                errors.push(format!("'{}' must be {}", key, kind));
            }
        }
    }

    errors
}
