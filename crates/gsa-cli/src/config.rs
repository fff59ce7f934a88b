use anyhow::{Context, Result};
use gsa_search::{Endpoint, SystemHosts};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    /// System name → appliance base address
    #[serde(default)]
    pub systems: SystemHosts,

    #[serde(default)]
    pub auth_cookie: Option<AuthCookieConfig>,

    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AuthCookieConfig {
    pub name: String,

    #[serde(default = "default_true")]
    pub http_only: bool,

    #[serde(default)]
    pub secure: bool,

    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub client: String,

    #[serde(default = "default_page_size")]
    pub results_per_page: u32,

    #[serde(default = "default_page_size")]
    pub max_suggestions: u32,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> u32 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            client: String::new(),
            results_per_page: default_page_size(),
            max_suggestions: default_page_size(),
        }
    }
}

impl Config {
    /// Address of `endpoint` for a configured system.
    pub fn resolve(&self, system: &str, endpoint: Endpoint) -> Result<String> {
        self.systems.resolve(system, endpoint).with_context(|| {
            let mut known: Vec<&str> = self.systems.systems().collect();
            known.sort_unstable();
            format!(
                "Unknown system '{}' (configured: {})",
                system,
                if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                }
            )
        })
    }
}

/// Load config from file or use defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let path = shellexpand::tilde(&path.to_string_lossy()).to_string();
    let content =
        fs::read_to_string(&path).context(format!("Failed to read config file: {:?}", path))?;

    toml::from_str(&content).context("Failed to parse TOML config")
}
