//! LLM統合のエラー型定義

use thiserror::Error;

/// LLM統合システムのエラー型
#[derive(Error, Debug)]
pub enum LlmError {
    /// API呼び出しエラー
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// 認証エラー
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// レート制限エラー
    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    /// 無効なリクエスト
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// 生成結果が空
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// ネットワークエラー
    #[error("Network error: {0}")]
    NetworkError(String),

    /// タイムアウト
    #[error("Request timeout after {0}s")]
    Timeout(u64),

    /// JSONパースエラー
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// HTTPエラー
    #[error("HTTP error: {0}")]
    HttpError(String),
}

impl LlmError {
    /// HTTPステータスからエラーを分類
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let message = body.into();
        match status {
            401 | 403 => LlmError::AuthError(message),
            429 => LlmError::RateLimitError(message),
            _ => LlmError::ApiError { status, message },
        }
    }
}

/// LLM統合システムの結果型
pub type LlmResult<T> = Result<T, LlmError>;
