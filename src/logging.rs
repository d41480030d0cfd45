use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// ログ出力で入力テキストを切り詰める長さ（文字数）
pub const LOG_EXCERPT_CHARS: usize = 80;

const LOG_FILE_NAME: &str = "mcp-social.log";

/// ログ設定
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// ログレベル (trace, debug, info, warn, error) または EnvFilter 構文
    pub level: String,
    /// ログディレクトリ
    pub log_dir: PathBuf,
    /// ファイルローテーション設定
    pub rotation: LogRotation,
    /// コンソール（stderr）出力有効
    pub console_enabled: bool,
    /// ファイル出力有効
    pub file_enabled: bool,
    /// JSON形式で出力
    pub json: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// 日次ローテーション
    #[default]
    Daily,
    /// 時間毎ローテーション
    Hourly,
    /// ローテーションなし
    Never,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            rotation: LogRotation::default(),
            console_enabled: true,
            file_enabled: false,
            json: false,
        }
    }
}

impl LogConfig {
    /// サーバー設定からログ設定を作成
    pub fn from_server_config(server_config: &crate::config::ServerConfig) -> Self {
        let mut config = Self {
            level: server_config.log_level.clone(),
            json: server_config.log_json,
            rotation: server_config.log_rotation,
            ..Self::default()
        };

        if let Some(ref dir) = server_config.log_dir {
            config.log_dir = dir.clone();
            config.file_enabled = true;
        }

        config
    }

    /// EnvFilterを作成（RUST_LOG が設定されていればそちらを優先）
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// ログディレクトリを確保
fn ensure_log_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    Ok(())
}

/// ログシステムを初期化
///
/// stdout は stdio トランスポートの JSON-RPC 用に空けておくため、コンソール出力は stderr。
/// ファイル出力が有効な場合に返る guard は、プロセス終了まで保持すること。
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>> = Vec::new();
    let mut guard = None;

    if config.console_enabled {
        let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
        layers.push(if config.json {
            layer.json().boxed()
        } else {
            layer.boxed()
        });
    }

    if config.file_enabled {
        ensure_log_dir(&config.log_dir)?;
        let file_appender = match config.rotation {
            LogRotation::Daily => rolling::daily(&config.log_dir, LOG_FILE_NAME),
            LogRotation::Hourly => rolling::hourly(&config.log_dir, LOG_FILE_NAME),
            LogRotation::Never => rolling::never(&config.log_dir, LOG_FILE_NAME),
        };
        let (writer, file_guard) = non_blocking(file_appender);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        layers.push(if config.json {
            layer.json().boxed()
        } else {
            layer.boxed()
        });
        guard = Some(file_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(config.env_filter())
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::info!(
        level = %config.level,
        console = config.console_enabled,
        file = config.file_enabled,
        log_dir = %config.log_dir.display(),
        "ログシステム初期化完了"
    );

    Ok(guard)
}

/// ログ用に入力テキストを切り詰める
pub fn truncate_for_log(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(LOG_EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console_enabled);
        assert!(!config.file_enabled);
        assert_eq!(config.rotation, LogRotation::Daily);
    }

    #[test]
    fn test_log_config_from_server_config() {
        let server = crate::config::ServerConfig {
            log_level: "debug".to_string(),
            log_dir: Some(PathBuf::from("/tmp/mcp-social-logs")),
            log_rotation: LogRotation::Never,
            ..Default::default()
        };

        let config = LogConfig::from_server_config(&server);
        assert_eq!(config.level, "debug");
        assert_eq!(config.rotation, LogRotation::Never);
        assert!(config.file_enabled);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/mcp-social-logs"));
    }

    #[test]
    fn test_ensure_log_dir() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("nested").join("logs");

        assert!(!log_dir.exists());
        ensure_log_dir(&log_dir).unwrap();
        assert!(log_dir.exists());
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short"), "short");

        let long = "あ".repeat(100);
        let truncated = truncate_for_log(&long);
        assert_eq!(truncated.chars().count(), LOG_EXCERPT_CHARS + 1);
        assert!(truncated.ends_with('…'));
    }
}
