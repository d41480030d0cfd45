//! Posting providers
//!
//! 生成したテキストをSNSへ投稿する不透明な関数。コンテンツ層からは使用せず、
//! ツールハンドラーが強化後のテキストを渡します。

pub mod error;
pub mod oauth;
pub mod twitter;

pub use error::{PostingError, PostingResult};
pub use twitter::{TwitterConfig, TwitterPublisher};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 投稿結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedPost {
    /// プロバイダーが採番した投稿ID
    pub id: String,
    /// 投稿されたテキスト
    pub text: String,
}

/// 投稿プロバイダートレイト
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostPublisher: Send + Sync {
    /// テキストを1件投稿する
    async fn post(&self, text: &str) -> PostingResult<PublishedPost>;

    /// 既存の投稿への返信として投稿する（スレッドの連結に使用）
    async fn reply(&self, text: &str, in_reply_to: &str) -> PostingResult<PublishedPost>;
}
