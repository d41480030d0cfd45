//! LLMプロバイダー実装

pub mod gemini;

use crate::llm::{
    config::{LlmConfig, ProviderKind},
    error::LlmResult,
    types::{LlmRequest, LlmResponse},
};
use async_trait::async_trait;
use std::sync::Arc;

/// LLMプロバイダートレイト
///
/// コンテンツ層から見た不透明な生成関数。1回の呼び出しで1つのテキストを返すか、
/// 失敗します。リトライは行いません。
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// 指示テキストからテキストを生成
    async fn generate(&self, request: &LlmRequest) -> LlmResult<LlmResponse>;

    /// プロバイダー名を取得
    fn name(&self) -> &str;

    /// サポートされるモデルのリスト
    fn supported_models(&self) -> Vec<String>;
}

/// プロバイダーファクトリー
pub fn create_provider(config: &LlmConfig) -> LlmResult<Arc<dyn LlmProvider>> {
    match config.provider {
        ProviderKind::Gemini => Ok(Arc::new(gemini::GeminiProvider::new(config.clone())?)),
    }
}
