//! 投稿プロバイダーのエラー型定義

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostingError {
    /// API呼び出しエラー
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// 認証エラー
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// レート制限エラー
    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// ネットワークエラー
    #[error("Network error: {0}")]
    NetworkError(String),

    /// タイムアウト
    #[error("Request timeout after {0}s")]
    Timeout(u64),

    /// 想定外のレスポンス
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSONパースエラー
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl PostingError {
    /// ユーザー向けの短い説明
    pub fn detail(&self) -> String {
        match self {
            PostingError::ApiError { message, .. }
            | PostingError::AuthError(message)
            | PostingError::RateLimitError(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type PostingResult<T> = Result<T, PostingError>;
