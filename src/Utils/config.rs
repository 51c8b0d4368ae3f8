//! Application settings read from a TOML document:
//!
//! ```toml
//! [engine]
//! max_length = 1000   # characters
//! max_depth = 100     # nesting levels, at most 256
//!
//! [calculator]
//! precision = 10      # decimals shown
//! angle_mode = "degrees"
//!
//! [logging]
//! level = "info"      # off, error, warn, info, debug, trace
//! file = "auto"       # or a file name; omit for terminal only
//! console = true
//! ```
//!
//! Every key is optional. A key with the wrong type or an unknown value is an error
//! rather than being silently replaced by its default.
use crate::Utils::logger::{LogSettings, parse_level};
use crate::calculators::scientific::DEFAULT_PRECISION;
use crate::expression::engine::EngineConfig;
use crate::expression::parser::DEPTH_CEILING;
use crate::expression::evaluator::AngleMode;
use std::fs;
use std::path::Path;
use thiserror::Error;
use toml::{Table, Value};

/// Most decimals an f64 can meaningfully show.
const MAX_PRECISION: usize = 17;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub calculator: CalculatorSettings,
    pub logging: LogSettings,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculatorSettings {
    pub precision: usize,
    pub angle_mode: AngleMode,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            angle_mode: AngleMode::default(),
        }
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Looks up `[section] name`; the whole section may be missing.
struct Section<'a> {
    name: &'static str,
    table: Option<&'a Table>,
}

impl<'a> Section<'a> {
    fn new(doc: &'a Table, name: &'static str) -> Result<Self, ConfigError> {
        let table = match doc.get(name) {
            None => None,
            Some(Value::Table(table)) => Some(table),
            Some(_) => return Err(invalid(name, "expected a table")),
        };
        Ok(Self { name, table })
    }

    fn key(&self, key: &str) -> String {
        format!("{}.{}", self.name, key)
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.table.and_then(|t| t.get(key))
    }

    fn positive(&self, key: &str, default: usize) -> Result<usize, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Integer(n)) if *n > 0 => Ok(*n as usize),
            Some(other) => Err(invalid(
                &self.key(key),
                format!("expected a positive integer, got {}", other),
            )),
        }
    }

    fn string(&self, key: &str) -> Result<Option<&'a str>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(invalid(
                &self.key(key),
                format!("expected a string, got {}", other),
            )),
        }
    }

    fn boolean(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Boolean(b)) => Ok(*b),
            Some(other) => Err(invalid(
                &self.key(key),
                format!("expected true or false, got {}", other),
            )),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let doc: Table = toml::from_str(text)?;
        let defaults = AppConfig::default();

        let engine = Section::new(&doc, "engine")?;
        let engine = EngineConfig {
            max_length: engine.positive("max_length", defaults.engine.max_length)?,
            max_depth: engine.positive("max_depth", defaults.engine.max_depth)?,
        };
        if engine.max_depth > DEPTH_CEILING {
            return Err(invalid(
                "engine.max_depth",
                format!("at most {} levels are supported, got {}", DEPTH_CEILING, engine.max_depth),
            ));
        }

        let calc = Section::new(&doc, "calculator")?;
        let precision = match calc.get("precision") {
            None => defaults.calculator.precision,
            Some(Value::Integer(n)) if (0..=MAX_PRECISION as i64).contains(n) => *n as usize,
            Some(other) => {
                return Err(invalid(
                    "calculator.precision",
                    format!("expected an integer from 0 to {}, got {}", MAX_PRECISION, other),
                ));
            }
        };
        let angle_mode = match calc.string("angle_mode")? {
            None => defaults.calculator.angle_mode,
            Some(name) => name
                .parse::<AngleMode>()
                .map_err(|_| invalid("calculator.angle_mode", format!("unknown mode '{}'", name)))?,
        };

        let log = Section::new(&doc, "logging")?;
        let level = match log.string("level")? {
            None => defaults.logging.level,
            Some(name) => parse_level(name)
                .ok_or_else(|| invalid("logging.level", format!("unknown level '{}'", name)))?,
        };
        let logging = LogSettings {
            level,
            file: log.string("file")?.map(str::to_string),
            console: log.boolean("console", defaults.logging.console)?,
        };

        Ok(AppConfig {
            engine,
            calculator: CalculatorSettings {
                precision,
                angle_mode,
            },
            logging,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
