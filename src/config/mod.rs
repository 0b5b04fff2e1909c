//! Configuration layer: typed settings with layered precedence
//! (file → environment → programmatic overrides).

use std::{num::NonZeroU32, path::Path, str::FromStr};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::cache::DEFAULT_NAMESPACE;

const LOCAL_CONFIG_BASENAME: &str = "partialcache";
const ENV_PREFIX: &str = "PARTIALCACHE";
const ENV_SEPARATOR: &str = "__";
const DEFAULT_DIRECTIVE: &str = "cache";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub cache: CacheSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub enabled: bool,
    /// Namespace prefix for keys and tags.
    pub key: String,
    /// Default TTL; `None` caches forever.
    pub duration_minutes: Option<NonZeroU32>,
    /// Name of the template hook integrations register. Not used by the cache itself.
    pub directive: String,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Values that take precedence over files and the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub enabled: Option<bool>,
    pub key: Option<String>,
    pub duration_minutes: Option<u32>,
    pub log_level: Option<String>,
    pub log_json: Option<bool>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence.
///
/// Sources, lowest first: `partialcache.{toml,json,yaml,...}` in the working
/// directory if present, `config_file` if given (must exist),
/// `PARTIALCACHE__SECTION__FIELD` environment variables, then `overrides`.
pub fn load(config_file: Option<&Path>, overrides: &Overrides) -> Result<Settings, LoadError> {
    load_with_environment(config_file, overrides, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR)
}

fn load_with_environment(
    config_file: Option<&Path>,
    overrides: &Overrides,
    environment: Environment,
) -> Result<Settings, LoadError> {
    let mut builder =
        Config::builder().add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(environment);

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(overrides);

    Settings::from_raw(raw)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache: CacheSettings {
                enabled: true,
                key: DEFAULT_NAMESPACE.to_string(),
                duration_minutes: None,
                directive: DEFAULT_DIRECTIVE.to_string(),
            },
            logging: LoggingSettings {
                level: LevelFilter::INFO,
                format: LogFormat::Compact,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    cache: RawCacheSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(enabled) = overrides.enabled {
            self.cache.enabled = Some(RawFlag::Bool(enabled));
        }
        if let Some(key) = overrides.key.as_ref() {
            self.cache.key = Some(key.clone());
        }
        if let Some(minutes) = overrides.duration_minutes {
            self.cache.duration = Some(minutes);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings { cache, logging } = raw;

        let cache = build_cache_settings(cache)?;
        let logging = build_logging_settings(logging)?;

        Ok(Self { cache, logging })
    }
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let enabled = match cache.enabled {
        Some(flag) => flag.coerce(),
        None => true,
    };

    let key = non_empty(cache.key, DEFAULT_NAMESPACE, "cache.key")?;
    let directive = non_empty(cache.directive, DEFAULT_DIRECTIVE, "cache.directive")?;

    let duration_minutes = match cache.duration {
        Some(minutes) => Some(
            NonZeroU32::new(minutes)
                .ok_or_else(|| LoadError::invalid("cache.duration", "must be greater than zero"))?,
        ),
        None => None,
    };

    Ok(CacheSettings {
        enabled,
        key,
        duration_minutes,
        directive,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn non_empty(
    value: Option<String>,
    default: &str,
    key: &'static str,
) -> Result<String, LoadError> {
    match value {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(LoadError::invalid(key, "must not be empty"));
            }
            Ok(trimmed.to_string())
        }
        None => Ok(default.to_string()),
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    enabled: Option<RawFlag>,
    key: Option<String>,
    duration: Option<u32>,
    directive: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

/// A boolean as it may appear in older configuration: native, numeric, or text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl RawFlag {
    /// Unrecognized text reads as false.
    fn coerce(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Int(value) => *value != 0,
            Self::Text(text) => parse_boolish(text).unwrap_or(false),
        }
    }
}

/// Permissive textual boolean: `true/false`, `1/0`, `yes/no`, `y/n`, `t/f`,
/// `on/off`, case-insensitive. Empty text is false.
pub fn parse_boolish(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "t" | "on" => Some(true),
        "false" | "0" | "no" | "n" | "f" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
