//! Layered configuration: defaults, optional TOML file, `MCP_SOCIAL_*` environment
//! variables, then the plain provider variables (`GEMINI_API_KEY`, `TWITTER_*`, ...).

use crate::error::{Error, Result};
use crate::llm::LlmConfig;
use crate::logging::LogRotation;
use crate::posting::TwitterConfig;
use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file names searched when no explicit path is given
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["mcp-social", "config/mcp-social"];

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gemini: LlmConfig,
    #[serde(default)]
    pub twitter: TwitterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// TCP bind address (used when `stdio` is false)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Serve JSON-RPC over stdin/stdout
    #[serde(default)]
    pub stdio: bool,
    /// ログレベル (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// ログファイル出力先（指定時のみファイル出力）
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// JSON形式のログ
    #[serde(default)]
    pub log_json: bool,
    /// ログファイルのローテーション
    #[serde(default)]
    pub log_rotation: LogRotation,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3001".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            stdio: false,
            log_level: default_log_level(),
            log_dir: None,
            log_json: false,
            log_rotation: LogRotation::default(),
        }
    }
}

/// Configuration loader with builder pattern
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_file: Option<PathBuf>,
    load_env: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from an explicit file (must exist)
    pub fn load_from_file(mut self, path: Option<&Path>) -> Self {
        self.config_file = path.map(Path::to_path_buf);
        self
    }

    /// Apply environment variable overrides
    pub fn load_from_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<AppConfig> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        match &self.config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                builder = builder.add_source(File::from(path.as_path()));
            }
            None => {
                for name in DEFAULT_CONFIG_FILES {
                    builder = builder.add_source(File::with_name(name).required(false));
                }
            }
        }

        if self.load_env {
            builder = builder.add_source(
                Environment::with_prefix("MCP_SOCIAL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let mut config: AppConfig = builder.build()?.try_deserialize()?;

        if self.load_env {
            apply_legacy_env(&mut config, |key| std::env::var(key).ok());
        }

        Ok(config)
    }
}

/// Plain provider variables, kept for compatibility with `.env` files
fn apply_legacy_env<F>(config: &mut AppConfig, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    let secret = |value: String| SecretString::new(value.into_boxed_str());

    if let Some(key) = var("GEMINI_API_KEY") {
        config.gemini.api_key = Some(secret(key));
    }
    if let Some(model) = var("GEMINI_MODEL") {
        config.gemini.default_model = model;
    }
    if let Some(key) = var("TWITTER_API_KEY") {
        config.twitter.api_key = Some(secret(key));
    }
    if let Some(key) = var("TWITTER_API_SECRET") {
        config.twitter.api_secret = Some(secret(key));
    }
    if let Some(key) = var("TWITTER_ACCESS_TOKEN") {
        config.twitter.access_token = Some(secret(key));
    }
    if let Some(key) = var("TWITTER_ACCESS_TOKEN_SECRET") {
        config.twitter.access_token_secret = Some(secret(key));
    }
    if let Some(bind_addr) = var("BIND_ADDR") {
        config.server.bind_addr = bind_addr;
    }
    if let Some(stdio) = var("MCP_STDIO").as_deref().and_then(parse_flag) {
        config.server.stdio = stdio;
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl AppConfig {
    /// Load from standard locations plus environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        ConfigLoader::new()
            .load_from_file(path)
            .load_from_env()
            .build()
    }

    /// サンプル設定ファイルの内容を生成
    pub fn sample_config() -> Result<String> {
        let sample = AppConfig::default();
        let toml_content =
            toml::to_string_pretty(&sample).map_err(|e| Error::Internal(e.to_string()))?;

        Ok(format!(
            r#"# mcp-social configuration file
#
# Save as mcp-social.toml. Every key can be overridden from the environment,
# e.g. MCP_SOCIAL_SERVER__BIND_ADDR=0.0.0.0:3001 or MCP_SOCIAL_GEMINI__DEFAULT_MODEL=gemini-2.5-pro.
# Credentials are never written to this file; set them through
#   GEMINI_API_KEY
#   TWITTER_API_KEY / TWITTER_API_SECRET / TWITTER_ACCESS_TOKEN / TWITTER_ACCESS_TOKEN_SECRET
# or [gemini] api_key / [twitter] api_key, ... entries.

{}"#,
            toml_content
        ))
    }

    /// サンプル設定ファイルを書き出す
    pub fn generate_sample_config(path: &Path) -> Result<()> {
        std::fs::write(path, Self::sample_config()?)?;
        Ok(())
    }
}
