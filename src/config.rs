//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::cache::DEFAULT_TTL_SECS;
use crate::vinted::market::Market;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Vinted marketplace
    #[serde(default)]
    pub market: Market,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Seconds a fetched result is served before the upstream is asked again
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Listings requested per catalog call
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Catalog sort order
    #[serde(default = "default_order")]
    pub order: String,

    /// Address the web server binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the web server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Output format of the `fetch` command
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

fn default_per_page() -> u32 {
    50
}

fn default_order() -> String {
    "newest_first".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            market: Market::Fr,
            proxy: None,
            cache_ttl_secs: default_cache_ttl_secs(),
            per_page: default_per_page(),
            order: default_order(),
            host: default_host(),
            port: default_port(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache time-to-live as a duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("vinted-watch").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides. Unparseable values are ignored.
    pub fn with_env(mut self) -> Self {
        if let Ok(market) = std::env::var("VINTED_MARKET") {
            if let Ok(m) = market.parse() {
                self.market = m;
            }
        }

        if let Ok(proxy) = std::env::var("VINTED_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(ttl) = std::env::var("VINTED_CACHE_TTL") {
            if let Ok(t) = ttl.parse() {
                self.cache_ttl_secs = t;
            }
        }

        if let Ok(host) = std::env::var("HOST") {
            if !host.trim().is_empty() {
                self.host = host;
            }
        }

        if let Ok(port) = std::env::var("PORT") {
            if let Ok(p) = port.parse() {
                self.port = p;
            }
        }

        self
    }
}

/// Output format for the `fetch` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.market, Market::Fr);
        assert_eq!(config.cache_ttl_secs, 25);
        assert_eq!(config.cache_ttl(), Duration::from_secs(25));
        assert_eq!(config.per_page, 50);
        assert_eq!(config.order, "newest_first");
        assert_eq!(config.bind_addr(), "0.0.0.0:10000");
        assert_eq!(config.format, OutputFormat::Table);
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);

        let err = "invalid".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("Unknown format"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            market = "be"
            cache_ttl_secs = 60
            port = 8080
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.market, Market::Be);
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.port, 8080);
        assert_eq!(config.per_page, 50);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_config_from_toml_all_fields() {
        let toml = r#"
            market = "de"
            proxy = "socks5://localhost:1080"
            cache_ttl_secs = 10
            per_page = 96
            order = "price_low_to_high"
            host = "127.0.0.1"
            port = 3000
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.market, Market::De);
        assert_eq!(config.proxy.as_deref(), Some("socks5://localhost:1080"));
        assert_eq!(config.cache_ttl_secs, 10);
        assert_eq!(config.per_page, 96);
        assert_eq!(config.order, "price_low_to_high");
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "market = \"it\"\nport = 9999").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.market, Market::It);
        assert_eq!(config.port, 9999);
    }

    #[test]
    fn test_config_from_file_not_found() {
        let err = Config::from_file("/nonexistent/path/config.toml").unwrap_err().to_string();
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let err = Config::from_file(file.path()).unwrap_err().to_string();
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "market = \"nl\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.market, Market::Nl);
    }

    // Single test for all env handling; the variables are process-global.
    #[test]
    fn test_config_with_env() {
        let keys = ["VINTED_MARKET", "VINTED_PROXY", "VINTED_CACHE_TTL", "HOST", "PORT"];
        let saved: Vec<_> = keys.iter().map(|k| (*k, std::env::var(k).ok())).collect();

        std::env::set_var("VINTED_MARKET", "es");
        std::env::set_var("VINTED_PROXY", "http://proxy:8080");
        std::env::set_var("VINTED_CACHE_TTL", "40");
        std::env::set_var("HOST", "127.0.0.1");
        std::env::set_var("PORT", "8081");

        let config = Config::new().with_env();
        assert_eq!(config.market, Market::Es);
        assert_eq!(config.proxy.as_deref(), Some("http://proxy:8080"));
        assert_eq!(config.cache_ttl_secs, 40);
        assert_eq!(config.bind_addr(), "127.0.0.1:8081");

        std::env::set_var("VINTED_MARKET", "atlantis");
        std::env::set_var("VINTED_CACHE_TTL", "soon");
        std::env::set_var("PORT", "not_a_port");

        let config = Config::new().with_env();
        assert_eq!(config.market, Market::Fr);
        assert_eq!(config.cache_ttl_secs, 25);
        assert_eq!(config.port, 10000);

        for (key, value) in saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}
