/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Kubeshift Config Module
//!
//! Layered settings for the kubeshift binaries. Only ambient concerns live
//! here; what to migrate and where is always given on the command line.
//!
//! # Variable Naming Convention
//!
//! - Struct fields use snake_case (e.g., `log.level`)
//! - Environment variables use SCREAMING_SNAKE_CASE and are prefixed with "KUBESHIFT__"
//!   (e.g., `KUBESHIFT__LOG__LEVEL`)
//! - Configuration file keys use snake_case (e.g., `log.format`)
//!
//! # Configuration Overriding
//!
//! Values are loaded in the following order (later sources take precedence):
//!
//! 1. Default values from the embedded `default.toml` file
//! 2. Values from an optional external configuration file (if provided)
//! 3. Environment variables
//!
//! # Available Environment Variables
//!
//! - `KUBESHIFT__LOG__LEVEL`: Sets the log level
//!   Default: "info"
//!   Possible values: "off", "trace", "debug", "info", "warn", "error"
//!
//! - `KUBESHIFT__LOG__FORMAT`: Sets the log output format
//!   Default: "text"
//!   Possible values: "text", "json"

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

// Include the default settings file as a string constant
const DEFAULT_SETTINGS: &str = include_str!("../default.toml");

/// Represents the main settings structure for the application
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Logging configuration
    pub log: Log,
}

/// Represents the logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Log {
    /// Log level (e.g., "info", "debug", "warn", "error")
    pub level: String,
    /// Log format: "text" for human-readable, "json" for structured JSON
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Settings {
    /// Creates a new `Settings` instance
    ///
    /// # Arguments
    ///
    /// * `file` - An optional path to a configuration file
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing the `Settings` instance or a `ConfigError`
    pub fn new(file: Option<String>) -> Result<Self, ConfigError> {
        let mut s = Config::builder()
            .add_source(File::from_str(DEFAULT_SETTINGS, config::FileFormat::Toml));

        s = match file {
            Some(x) => s.add_source(File::with_name(x.as_str())),
            None => s,
        };

        // Prefixed with "KUBESHIFT" and using "__" as a separator
        s = s.add_source(Environment::with_prefix("KUBESHIFT").separator("__"));

        s.build()?.try_deserialize()
    }
}
