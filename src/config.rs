//! Configuration loaded from `config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculator::{AngleMode, Base};
use crate::converter::{Category, ConversionFault};
use crate::plot::DEFAULT_SAMPLES;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is not set (default: "warn").
    pub log_level: LogLevel,
    pub display: DisplayConfig,
    pub scientific: ScientificConfig,
    pub programmer: ProgrammerConfig,
    pub converter: ConverterConfig,
    pub plot: PlotConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub String);

impl LogLevel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self("warn".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Insert thousand separators into the scientific display.
    pub group_digits: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScientificConfig {
    pub angle_mode: AngleMode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgrammerConfig {
    pub base: Base,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Category selected at startup.
    pub category: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            category: Category::default().name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub samples: usize,
    pub xmin: f64,
    pub xmax: f64,
    pub expression: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            xmin: -10.0,
            xmax: 10.0,
            expression: "x**2".to_string(),
        }
    }
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/mpkcal/config.toml` on Linux, or the platform equivalent
    /// via `dirs::config_dir()`. Falls back to the current directory.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("mpkcal").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The plot uses at least two samples over a non-empty range
    /// - The converter category exists
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plot.samples < 2 {
            return Err(ConfigError::ValidationError {
                message: format!("plot.samples must be at least 2, got {}", self.plot.samples),
            });
        }

        let (xmin, xmax) = (self.plot.xmin, self.plot.xmax);
        if !xmin.is_finite() || !xmax.is_finite() || xmin >= xmax {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "plot.xmin ({}) must be less than plot.xmax ({})",
                    xmin, xmax
                ),
            });
        }

        self.converter_category()?;
        Ok(())
    }

    /// The configured converter category.
    pub fn converter_category(&self) -> Result<Category, ConfigError> {
        self.converter
            .category
            .parse()
            .map_err(|e: ConversionFault| ConfigError::ValidationError {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level.as_str(), "warn");
        assert_eq!(config.plot.samples, 400);
        assert_eq!(config.programmer.base, Base::Decimal);
        assert_eq!(config.scientific.angle_mode, AngleMode::Degrees);
    }

    #[test]
    fn test_default_path() {
        assert!(Config::config_path().ends_with("mpkcal/config.toml"));
    }

    #[test]
    fn test_partial_file() {
        let file = write_config(
            r#"
log_level = "debug"

[programmer]
base = "hex"

[scientific]
angle_mode = "radians"

[plot]
expression = "sin(x)"
"#,
        );
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.log_level.as_str(), "debug");
        assert_eq!(config.programmer.base, Base::Hexadecimal);
        assert_eq!(config.scientific.angle_mode, AngleMode::Radians);
        assert_eq!(config.plot.expression, "sin(x)");
        assert_eq!(config.plot.xmax, 10.0);
        assert!(!config.display.group_digits);
    }

    #[test]
    fn test_parse_error() {
        let file = write_config("[plot\nsamples = 3");
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_validation_errors() {
        let file = write_config("[plot]\nsamples = 1\n");
        assert!(matches!(
            Config::load_from(file.path()),
            Err(ConfigError::ValidationError { .. })
        ));

        let file = write_config("[plot]\nxmin = 5.0\nxmax = 5.0\n");
        assert!(Config::load_from(file.path()).is_err());

        let file = write_config("[converter]\ncategory = \"Speed\"\n");
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_converter_category() {
        let file = write_config("[converter]\ncategory = \"temperature\"\n");
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.converter_category().unwrap(), Category::Temperature);
    }
}
