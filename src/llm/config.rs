//! LLM統合の設定

use crate::llm::error::{LlmError, LlmResult};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini APIのデフォルトエンドポイント
pub const GEMINI_DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// LLMプロバイダー種別
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini
    #[default]
    Gemini,
}

/// LLM設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// プロバイダー
    #[serde(default)]
    pub provider: ProviderKind,
    /// APIキー（セキュア）
    #[serde(skip_serializing)]
    pub api_key: Option<SecretString>,
    /// APIエンドポイント（未指定時は公式エンドポイント）
    pub endpoint: Option<String>,
    /// デフォルトモデル
    #[serde(default = "default_model")]
    pub default_model: String,
    /// リクエストタイムアウト（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// デフォルト温度
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,
    /// デフォルト最大出力トークン数
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

impl LlmConfig {
    /// Gemini設定を作成
    pub fn gemini(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: ProviderKind::Gemini,
            api_key: Some(SecretString::new(api_key.into().into_boxed_str())),
            endpoint: None,
            default_model: model.into(),
            timeout_secs: default_timeout(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
        }
    }

    /// 環境変数からGemini設定を読み込み
    pub fn gemini_from_env() -> LlmResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| LlmError::ConfigError("GEMINI_API_KEY not set".to_string()))?;

        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| default_model());

        Ok(Self::gemini(api_key, model))
    }

    /// エンドポイントを設定
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// タイムアウトを取得
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 実際に使用するエンドポイント（末尾スラッシュなし）
    pub fn endpoint_or_default(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or(GEMINI_DEFAULT_ENDPOINT)
            .trim_end_matches('/')
    }

    /// APIキーを取得（露出）
    pub fn get_api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret())
    }

    /// 設定を検証
    pub fn validate(&self) -> LlmResult<()> {
        match self.get_api_key() {
            Some(key) if !key.trim().is_empty() => {}
            _ => {
                return Err(LlmError::ConfigError(
                    "API key is required for Gemini".to_string(),
                ))
            }
        }

        if self.default_model.trim().is_empty() {
            return Err(LlmError::ConfigError("Model name is required".to_string()));
        }

        // 温度の範囲チェック
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(LlmError::ConfigError(
                "Temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.default_max_tokens == 0 || self.default_max_tokens > 100_000 {
            return Err(LlmError::ConfigError(
                "max_tokens must be between 1 and 100000".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(LlmError::ConfigError(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            api_key: None,
            endpoint: None,
            default_model: default_model(),
            timeout_secs: default_timeout(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
        }
    }
}
