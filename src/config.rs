use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub wiki: WikiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Upstream wiki settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WikiConfig {
    /// MediaWiki `api.php` endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_url() -> String {
    "https://wiki.eveuniversity.org/api.php".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("eve-wiki-mcp/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// MCP over stdin/stdout, for local clients
    #[default]
    Stdio,
    /// HTTP API with auth and rate limiting, for containers
    Http,
}

impl std::str::FromStr for Transport {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            // "sse" is what older deployments set
            "http" | "sse" => Ok(Transport::Http),
            other => Err(anyhow::anyhow!("Unknown transport: {}", other)),
        }
    }
}

/// Settings for the remote (HTTP) transport
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default)]
    pub transport: Transport,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token required on every request except `/health` when set
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Allowed CORS origins; CORS is off when empty
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Requests allowed per client inside one window (default: 60)
    #[serde(default = "default_rate_limit_requests")]
    pub rate_limit_requests: usize,

    /// Sliding window length in seconds (default: 60)
    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_rate_limit_requests() -> usize {
    60
}

fn default_rate_limit_window() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            host: default_host(),
            port: default_port(),
            auth_token: None,
            cors_origins: Vec::new(),
            rate_limit_requests: default_rate_limit_requests(),
            rate_limit_window_secs: default_rate_limit_window(),
        }
    }
}

impl Config {
    /// Load from the config file (defaults when absent), then apply
    /// environment overrides and validate.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config file")?;

        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("eve-wiki-mcp").join("config.toml"))
    }

    /// Environment variables win over the file, matching how the container
    /// image is configured.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(transport) = std::env::var("MCP_TRANSPORT") {
            self.server.transport = transport.parse()?;
        }
        if let Ok(host) = std::env::var("MCP_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("MCP_PORT") {
            self.server.port = port.parse().context("MCP_PORT must be a port number")?;
        }
        if let Ok(token) = std::env::var("MCP_AUTH_TOKEN") {
            self.server.auth_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Ok(requests) = std::env::var("RATE_LIMIT_REQUESTS") {
            self.server.rate_limit_requests = requests
                .parse()
                .context("RATE_LIMIT_REQUESTS must be a whole number")?;
        }
        if let Ok(window) = std::env::var("RATE_LIMIT_WINDOW") {
            self.server.rate_limit_window_secs = window
                .parse()
                .context("RATE_LIMIT_WINDOW must be a number of seconds")?;
        }
        if let Ok(api) = std::env::var("EVE_WIKI_API") {
            self.wiki.api_url = api;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.wiki.api_url)
            .with_context(|| format!("Invalid wiki api_url: {}", self.wiki.api_url))?;
        if self.wiki.timeout_secs == 0 {
            anyhow::bail!("wiki.timeout_secs must be greater than zero");
        }
        if self.server.rate_limit_window_secs == 0 {
            anyhow::bail!("server.rate_limit_window_secs must be greater than zero");
        }
        Ok(())
    }
}
