use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Access scopes the embedded app asks the platform for.
pub const DEFAULT_SCOPES: &str = "read_products,write_products,read_themes,write_themes,\
                                  write_online_store_pages,read_script_tags,write_script_tags,\
                                  write_content";

/// Hosted loader script the installed script tags point at.
pub const DEFAULT_LOADER_URL: &str = "https://celebrated-cobbler-c97fe5.netlify.app/ai-tools.js";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub credentials: Credentials,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid bind address: {e}")))
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("toolforge.db")
    }
}

/// Platform and text-service credentials. Loaded from a TOML file when
/// `--config` is given, otherwise from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    #[serde(default = "default_scopes")]
    pub scopes: String,
    pub redirect_uri: String,
    /// Base URL of the embedded admin frontend; OAuth callbacks redirect
    /// back here.
    pub app_url: String,
    pub ai_api_key: String,
    #[serde(default = "default_loader_url")]
    pub loader_url: String,
}

fn default_scopes() -> String {
    DEFAULT_SCOPES.to_string()
}

fn default_loader_url() -> String {
    DEFAULT_LOADER_URL.to_string()
}

impl Credentials {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        match config_file {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                toml::from_str(&raw)
                    .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
            }
            None => Self::from_env(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: require_env("SHOPIFY_API_KEY")?,
            api_secret: require_env("SHOPIFY_API_SECRET")?,
            scopes: optional_env("SHOPIFY_SCOPES").unwrap_or_else(default_scopes),
            redirect_uri: require_env("SHOPIFY_REDIRECT_URI")?,
            app_url: require_env("SHOPIFY_APP_URL")?,
            ai_api_key: require_env("GEMINI_API_KEY")?,
            loader_url: optional_env("TOOL_LOADER_URL").unwrap_or_else(default_loader_url),
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    optional_env(name).ok_or_else(|| Error::Config(format!("{name} is not set")))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
