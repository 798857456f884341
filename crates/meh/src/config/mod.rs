//! Layered configuration.
//!
//! Files are read from a configuration directory in this order, later files
//! overriding earlier ones key by key:
//!
//! 1. `default.<ext>`
//! 2. `<environment>.<ext>`
//! 3. `local.<ext>`
//!
//! For each base name every file-format extension in the [`ParserRegistry`]
//! order is tried; the value coercions (`boolean`, `number`) are not. Missing
//! files are skipped, and every document must be an object at its root.
//!
//! The directory comes from `MEH_CONFIG_DIR` (default `config`) and the
//! environment from `MEH_ENV` (default `development`).

mod parser;

pub use parser::{ParseError, Parser, ParserRegistry, parse_boolean, parse_number};

use meh_core::{EncapsulatedError, Reason, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration directory.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Default environment name.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// A read-only key/value configuration source addressed by dotted paths.
pub trait ConfigSource {
    /// The value at `path` (e.g. `"log.level"`); the empty path is the root.
    fn get(&self, path: &str) -> Option<&Value>;

    /// Whether a value exists at `path`.
    fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Deserialize the value at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the property is not defined or has the wrong shape.
    fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.get(path).ok_or_else(|| {
            EncapsulatedError::new(format!("Configuration property \"{path}\" is not defined"))
                .with_details(json!({ "path": path }))
        })?;

        serde_json::from_value(value.clone()).map_err(|err| {
            EncapsulatedError::new(format!("Configuration property \"{path}\" is invalid"))
                .with_reason(err)
                .with_details(json!({ "path": path }))
        })
    }
}

/// Merged configuration tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    root: Value,
    sources: Vec<PathBuf>,
}

impl Config {
    /// Wrap an existing tree.
    pub fn from_value(root: Value) -> Self {
        Self {
            root,
            sources: Vec::new(),
        }
    }

    /// Load from the directory and environment named by `MEH_CONFIG_DIR`
    /// and `MEH_ENV`.
    ///
    /// # Errors
    ///
    /// Fails when a configuration file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let dir = std::env::var("MEH_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.into());
        let environment =
            std::env::var("MEH_ENV").unwrap_or_else(|_| DEFAULT_ENVIRONMENT.into());

        Self::load_from(Path::new(&dir), &environment, &ParserRegistry::default())
    }

    /// Load from `dir` for `environment`, using `parsers` for every file.
    ///
    /// # Errors
    ///
    /// Fails when a configuration file exists but cannot be read or parsed,
    /// or when its document is not an object.
    pub fn load_from(dir: &Path, environment: &str, parsers: &ParserRegistry) -> Result<Self> {
        let mut config = Self::default();

        for base in ["default", environment, "local"] {
            for extension in parsers.formats() {
                let path = dir.join(format!("{base}.{extension}"));
                if !path.is_file() {
                    continue;
                }

                let details = json!({ "path": path.display().to_string() });
                let content = std::fs::read_to_string(&path).map_err(|err| {
                    EncapsulatedError::new("Failed to read configuration file")
                        .with_reason(err)
                        .with_details(details.clone())
                })?;

                let parsed = parsers
                    .parse(&path.to_string_lossy(), &content)
                    .map_err(|err| {
                        EncapsulatedError::new("Failed to parse configuration file")
                            .with_reason(Reason::foreign(err))
                            .with_details(details.clone())
                    })?;

                match parsed {
                    Some(value @ Value::Object(_)) => merge(&mut config.root, value),
                    Some(_) => {
                        return Err(EncapsulatedError::new(
                            "Configuration file must contain an object at its root",
                        )
                        .with_details(details));
                    }
                    None => {}
                }
                debug!(path = %path.display(), "Loaded configuration file");
                config.sources.push(path);
            }
        }

        Ok(config)
    }

    /// Files that contributed to this configuration, in load order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// The logger options, with environment overrides applied.
    ///
    /// A missing `log` property yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails when the `log` property has the wrong shape.
    pub fn log(&self) -> Result<LogConfig> {
        let config = if self.has("log") {
            self.get_as::<LogConfig>("log")?
        } else {
            LogConfig::default()
        };

        Ok(config.with_env_overrides())
    }
}

impl ConfigSource for Config {
    fn get(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(&self.root);
        }

        path.split('.')
            .try_fold(&self.root, |value, segment| value.as_object()?.get(segment))
    }
}

/// Deep-merge `overlay` into `base`: objects merge key by key, anything else
/// replaces.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Logger options, read from the `log` property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    /// Minimum level: trace, debug, info, warn or error
    pub level: String,

    /// Human-readable output instead of JSON lines
    pub pretty_print: bool,

    /// Include timestamps
    pub timestamp: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            pretty_print: false,
            timestamp: false,
        }
    }
}

impl LogConfig {
    /// Apply environment overrides.
    ///
    /// This will look for:
    /// - `MEH_LOG_LEVEL` for the level
    /// - `MEH_LOG_PRETTY` for pretty printing (`"true"` enables it)
    /// - `MEH_LOG_TIMESTAMP` for timestamps (`"true"` enables it)
    pub fn with_env_overrides(mut self) -> Self {
        use std::env;

        if let Ok(level) = env::var("MEH_LOG_LEVEL") {
            self.level = level;
        }

        if let Ok(pretty) = env::var("MEH_LOG_PRETTY") {
            self.pretty_print = parse_boolean(&pretty);
        }

        if let Ok(timestamp) = env::var("MEH_LOG_TIMESTAMP") {
            self.timestamp = parse_boolean(&timestamp);
        }

        self
    }
}
