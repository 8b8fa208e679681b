//! Configuration file handling with TOML support, plus the startup inputs:
//! the profile file and the API key file.

use crate::models::Symbol;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Watch-list used when no profile file is given.
pub const DEFAULT_SYMBOLS: [&str; 5] = ["AAPL", "GOOGL", "MSFT", "BTCUSDT", "ETHUSDT"];

/// Shortest allowed timer period, in seconds.
pub const MIN_INTERVAL_SECS: f64 = 1.0;

/// Startup failures that stop the program before the UI comes up.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading profile file {path}: {source}")]
    ProfileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("profile file {0} is empty or contains no valid symbols")]
    ProfileEmpty(PathBuf),
    #[error("failed to read config file {path}: {source}")]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    /// Quote provider endpoints
    #[serde(default)]
    pub providers: ProviderConfig,

    /// Color scheme
    #[serde(default)]
    pub colors: ColorConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Seconds between data refreshes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: f64,

    /// Seconds between repaints
    #[serde(default = "default_repaint_interval")]
    pub repaint_interval: f64,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// File holding the equity provider API key
    #[serde(default = "default_api_key_file")]
    pub api_key_file: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
            repaint_interval: default_repaint_interval(),
            timeout: default_timeout(),
            api_key_file: default_api_key_file(),
        }
    }
}

fn default_refresh_interval() -> f64 {
    10.0
}
fn default_repaint_interval() -> f64 {
    1.0
}
fn default_timeout() -> u64 {
    10
}
fn default_api_key_file() -> PathBuf {
    PathBuf::from("finnhub_key.txt")
}

/// Base URLs of the two quote providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_equity_url")]
    pub equity_url: String,

    #[serde(default = "default_crypto_url")]
    pub crypto_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            equity_url: default_equity_url(),
            crypto_url: default_crypto_url(),
        }
    }
}

fn default_equity_url() -> String {
    "https://finnhub.io/api/v1/quote".to_string()
}
fn default_crypto_url() -> String {
    "https://api.binance.com/api/v3/ticker/24hr".to_string()
}

/// Color configuration using hex codes or color names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub title: String,
    pub accent: String,
    pub highlight: String,
    pub gain: String,
    pub loss: String,
    pub muted: String,
    pub cursor: String,
    pub crypto: String,
    pub equity: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            title: "#00ffff".to_string(),
            accent: "#874bfd".to_string(),
            highlight: "#ffd700".to_string(),
            gain: "#00ff00".to_string(),
            loss: "#ff0000".to_string(),
            muted: "#888888".to_string(),
            cursor: "#ff00ff".to_string(),
            crypto: "#ffa500".to_string(),
            equity: "#4169e1".to_string(),
        }
    }
}

/// Resolved colors, built once at startup and only read afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub title: Color,
    pub accent: Color,
    pub highlight: Color,
    pub gain: Color,
    pub loss: Color,
    pub muted: Color,
    pub cursor: Color,
    pub crypto: Color,
    pub equity: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from(&ColorConfig::default())
    }
}

impl From<&ColorConfig> for Theme {
    fn from(colors: &ColorConfig) -> Self {
        Self {
            title: parse_color(&colors.title, Color::Cyan),
            accent: parse_color(&colors.accent, Color::Magenta),
            highlight: parse_color(&colors.highlight, Color::Yellow),
            gain: parse_color(&colors.gain, Color::Green),
            loss: parse_color(&colors.loss, Color::Red),
            muted: parse_color(&colors.muted, Color::DarkGray),
            cursor: parse_color(&colors.cursor, Color::LightMagenta),
            crypto: parse_color(&colors.crypto, Color::LightYellow),
            equity: parse_color(&colors.equity, Color::Blue),
        }
    }
}

fn parse_color(value: &str, fallback: Color) -> Color {
    Color::from_str(value).unwrap_or_else(|_| {
        warn!(value, "unrecognized color, using default");
        fallback
    })
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ConfigUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::ConfigInvalid {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from the default location, falling back to defaults.
    pub fn load_or_default() -> Self {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => {
                        info!(path = %path.display(), "loaded config");
                        return config;
                    }
                    Err(e) => warn!("Failed to load config: {}", e),
                }
            }
        }
        Config::default()
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pricewatch").join("config.toml"))
    }

    pub fn refresh_interval(&self) -> Duration {
        clamp_interval(self.general.refresh_interval)
    }

    pub fn repaint_interval(&self) -> Duration {
        clamp_interval(self.general.repaint_interval)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.general.timeout.max(1))
    }

    pub fn theme(&self) -> Theme {
        Theme::from(&self.colors)
    }
}

fn clamp_interval(secs: f64) -> Duration {
    if secs.is_finite() && secs >= MIN_INTERVAL_SECS {
        Duration::from_secs_f64(secs)
    } else {
        Duration::from_secs_f64(MIN_INTERVAL_SECS)
    }
}

/// The built-in watch-list.
pub fn default_symbols() -> Vec<Symbol> {
    DEFAULT_SYMBOLS.iter().filter_map(|s| Symbol::new(s)).collect()
}

/// Read a profile file: one symbol per line, blank lines skipped.
pub fn load_symbols_file(path: &Path) -> Result<Vec<Symbol>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ProfileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let symbols = parse_symbols(&content);
    if symbols.is_empty() {
        return Err(ConfigError::ProfileEmpty(path.to_path_buf()));
    }
    Ok(symbols)
}

fn parse_symbols(content: &str) -> Vec<Symbol> {
    content.lines().filter_map(Symbol::new).collect()
}

/// Read the equity provider API key. A missing or empty file is not an error.
pub fn load_api_key(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let key = content.trim();
            (!key.is_empty()).then(|| key.to_string())
        }
        Err(e) => {
            info!(path = %path.display(), error = %e, "no API key, equity quotes disabled");
            None
        }
    }
}

/// Generate a sample configuration file content.
pub fn sample_config() -> &'static str {
    r##"# pricewatch configuration file

[general]
# Seconds between quote refreshes (minimum 1)
refresh_interval = 10.0
# Seconds between screen repaints (minimum 1)
repaint_interval = 1.0
# HTTP timeout in seconds
timeout = 10
# File holding the Finnhub API key
api_key_file = "finnhub_key.txt"

[providers]
equity_url = "https://finnhub.io/api/v1/quote"
crypto_url = "https://api.binance.com/api/v3/ticker/24hr"

[colors]
title = "#00ffff"
accent = "#874bfd"
highlight = "#ffd700"
gain = "#00ff00"
loss = "#ff0000"
muted = "#888888"
cursor = "#ff00ff"
crypto = "#ffa500"
equity = "#4169e1"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.refresh_interval(), Duration::from_secs(10));
        assert_eq!(config.repaint_interval(), Duration::from_secs(1));
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.general.api_key_file, PathBuf::from("finnhub_key.txt"));
    }

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(sample_config()).unwrap();
        assert_eq!(config.general.refresh_interval, 10.0);
        assert_eq!(config.providers.crypto_url, default_crypto_url());
        assert_eq!(config.theme(), Theme::default());
    }

    #[test]
    fn test_partial_config_and_interval_floor() {
        let config: Config = toml::from_str(
            r#"
            [general]
            refresh_interval = 0.2

            [colors]
            gain = "not-a-color"
            "#,
        )
        .unwrap();
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
        assert_eq!(config.repaint_interval(), Duration::from_secs(1));
        assert_eq!(config.theme().gain, Color::Green);
        assert_eq!(config.theme().loss, Color::Rgb(0xff, 0, 0));
    }

    #[test]
    fn test_invalid_config_is_error() {
        let file = temp_file("[general]\nrefresh_interval = \"fast\"\n");
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_symbols_file_normalization() {
        let file = temp_file("aapl\n\n   btcusdt  \n\t\nMsft\n");
        let symbols = load_symbols_file(file.path()).unwrap();
        let names: Vec<&str> = symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, ["AAPL", "BTCUSDT", "MSFT"]);
    }

    #[test]
    fn test_empty_symbols_file_is_error() {
        let file = temp_file("\n   \n\n");
        let err = load_symbols_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ProfileEmpty(_)));
        assert!(err.to_string().contains("no valid symbols"));
    }

    #[test]
    fn test_missing_symbols_file_is_error() {
        let err = load_symbols_file(Path::new("/nonexistent/pricewatch/profile.txt")).unwrap_err();
        assert!(matches!(err, ConfigError::ProfileUnreadable { .. }));
    }

    #[test]
    fn test_api_key_loading() {
        let file = temp_file("  abc123  \n");
        assert_eq!(load_api_key(file.path()), Some("abc123".to_string()));

        let empty = temp_file("\n");
        assert_eq!(load_api_key(empty.path()), None);

        assert_eq!(load_api_key(Path::new("/nonexistent/finnhub_key.txt")), None);
    }

    #[test]
    fn test_default_symbols() {
        let names: Vec<String> = default_symbols().iter().map(ToString::to_string).collect();
        assert_eq!(names, DEFAULT_SYMBOLS);
    }
}
