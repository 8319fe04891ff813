//! Run-time settings read from a TOML file.
//!
//! ```toml
//! [plot]
//! width = 1024
//! height = 768
//! samples = 200
//!
//! [solver]
//! tolerance = 1e-10
//!
//! [log]
//! level = "debug"
//! to_file = true
//! ```
//! Every key is optional; missing keys keep their defaults.

use log::LevelFilter;
use std::path::Path;
use thiserror::Error;
use toml::{Table, Value};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("malformed TOML: {0}")]
    Toml(String),
    #[error("key {key} has the wrong type: expected {expected}")]
    WrongType { key: String, expected: &'static str },
    #[error("unknown log level {0}: must be debug, info, warn, error or off")]
    UnknownLogLevel(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiMathConfig {
    pub plot_width: u32,
    pub plot_height: u32,
    /// points per sampled curve
    pub samples: usize,
    /// absolute tolerance of numeric zero tests
    pub tolerance: f64,
    pub log_level: String,
    pub log_to_file: bool,
}

impl Default for LiMathConfig {
    fn default() -> Self {
        LiMathConfig {
            plot_width: 800,
            plot_height: 600,
            samples: 100,
            tolerance: 1e-10,
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

fn section<'a>(table: &'a Table, name: &str) -> Result<Option<&'a Table>, ConfigError> {
    match table.get(name) {
        None => Ok(None),
        Some(Value::Table(inner)) => Ok(Some(inner)),
        Some(_) => Err(ConfigError::WrongType {
            key: name.to_string(),
            expected: "table",
        }),
    }
}

fn integer(table: &Table, section: &str, key: &str) -> Result<Option<i64>, ConfigError> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::Integer(i)) if *i > 0 => Ok(Some(*i)),
        Some(_) => Err(ConfigError::WrongType {
            key: format!("{}.{}", section, key),
            expected: "positive integer",
        }),
    }
}

impl LiMathConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let table = input
            .parse::<Table>()
            .map_err(|e| ConfigError::Toml(e.to_string()))?;
        let mut config = LiMathConfig::default();

        if let Some(plot) = section(&table, "plot")? {
            if let Some(width) = integer(plot, "plot", "width")? {
                config.plot_width = width as u32;
            }
            if let Some(height) = integer(plot, "plot", "height")? {
                config.plot_height = height as u32;
            }
            if let Some(samples) = integer(plot, "plot", "samples")? {
                config.samples = samples as usize;
            }
        }
        if let Some(solver) = section(&table, "solver")? {
            match solver.get("tolerance") {
                None => {}
                Some(Value::Float(tol)) if *tol > 0.0 => config.tolerance = *tol,
                Some(_) => {
                    return Err(ConfigError::WrongType {
                        key: "solver.tolerance".to_string(),
                        expected: "positive float",
                    });
                }
            }
        }
        if let Some(log) = section(&table, "log")? {
            match log.get("level") {
                None => {}
                Some(Value::String(level)) => config.log_level = level.to_lowercase(),
                Some(_) => {
                    return Err(ConfigError::WrongType {
                        key: "log.level".to_string(),
                        expected: "string",
                    });
                }
            }
            match log.get("to_file") {
                None => {}
                Some(Value::Boolean(flag)) => config.log_to_file = *flag,
                Some(_) => {
                    return Err(ConfigError::WrongType {
                        key: "log.to_file".to_string(),
                        expected: "boolean",
                    });
                }
            }
        }
        // fail on a bad level now rather than at logger start-up
        config.level_filter()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        match self.log_level.as_str() {
            "debug" => Ok(LevelFilter::Debug),
            "info" => Ok(LevelFilter::Info),
            "warn" => Ok(LevelFilter::Warn),
            "error" => Ok(LevelFilter::Error),
            "off" => Ok(LevelFilter::Off),
            other => Err(ConfigError::UnknownLogLevel(other.to_string())),
        }
    }

    pub fn plot_size(&self) -> (u32, u32) {
        (self.plot_width, self.plot_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_empty() {
        let config = LiMathConfig::from_toml_str("").unwrap();
        assert_eq!(config, LiMathConfig::default());
        assert_eq!(config.plot_size(), (800, 600));
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn test_partial_override() {
        let input = r#"
            [plot]
            width = 1024
            samples = 50

            [log]
            level = "DEBUG"
            to_file = true
        "#;
        let config = LiMathConfig::from_toml_str(input).unwrap();
        assert_eq!(config.plot_size(), (1024, 600));
        assert_eq!(config.samples, 50);
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);
        assert!(config.log_to_file);
        assert_eq!(config.tolerance, 1e-10);
    }

    #[test]
    fn test_errors() {
        let err = LiMathConfig::from_toml_str("[plot]\nwidth = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::WrongType { .. }));
        let err = LiMathConfig::from_toml_str("[plot]\nwidth = -3").unwrap_err();
        assert!(matches!(err, ConfigError::WrongType { .. }));
        let err = LiMathConfig::from_toml_str("[log]\nlevel = \"loud\"").unwrap_err();
        assert_eq!(err, ConfigError::UnknownLogLevel("loud".to_string()));
        let err = LiMathConfig::from_toml_str("[plot").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        let err = LiMathConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[solver]\ntolerance = 1e-6").unwrap();
        let config = LiMathConfig::from_file(file.path()).unwrap();
        assert_eq!(config.tolerance, 1e-6);
    }
}
