//! Content Enhancer
//!
//! 短い入力を1件のツイートへ強化する

use crate::content::{generate_or_fallback, prompts, Outcome};
use crate::llm::{GenerationParams, LlmProvider};
use std::sync::Arc;

/// 強化時の温度（創造的だがランダムすぎない）
pub const ENHANCE_TEMPERATURE: f32 = 0.7;

/// 強化時の最大出力トークン数（ツイート1件分）
pub const ENHANCE_MAX_OUTPUT_TOKENS: u32 = 100;

/// 強化時の思考トークン予算。出力上限を思考で使い切らないよう無効化する
pub const ENHANCE_THINKING_BUDGET: u32 = 0;

/// 単一ツイート強化器
#[derive(Clone)]
pub struct ContentEnhancer {
    provider: Arc<dyn LlmProvider>,
}

impl ContentEnhancer {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// 入力を強化する。失敗時は入力をそのまま返す
    pub async fn enhance(&self, original: &str) -> String {
        self.enhance_outcome(original).await.into_inner()
    }

    /// 成功かフォールバックかを区別して強化する
    pub async fn enhance_outcome(&self, original: &str) -> Outcome<String> {
        let params = GenerationParams::new(ENHANCE_TEMPERATURE)
            .with_max_output_tokens(ENHANCE_MAX_OUTPUT_TOKENS)
            .with_thinking_budget(ENHANCE_THINKING_BUDGET);

        generate_or_fallback(
            self.provider.as_ref(),
            "enhance",
            original,
            prompts::enhance_prompt(original),
            params,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmResult, TokenUsage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingProvider {
        reply: Option<String>,
        seen: Mutex<Vec<LlmRequest>>,
    }

    #[async_trait]
    impl LlmProvider for RecordingProvider {
        async fn generate(&self, request: &LlmRequest) -> LlmResult<LlmResponse> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Some(text) => Ok(LlmResponse {
                    content: text.clone(),
                    model: "test".to_string(),
                    usage: TokenUsage::default(),
                    finish_reason: None,
                }),
                None => Err(LlmError::NetworkError("unreachable".to_string())),
            }
        }

        fn name(&self) -> &str {
            "recording"
        }

        fn supported_models(&self) -> Vec<String> {
            vec![]
        }
    }

    fn provider(reply: Option<&str>) -> Arc<RecordingProvider> {
        Arc::new(RecordingProvider {
            reply: reply.map(str::to_string),
            seen: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_enhance_trims_generated_text() {
        let p = provider(Some("\n  🎉 We won! #hackathon  \n"));
        let enhancer = ContentEnhancer::new(p.clone());

        let result = enhancer.enhance("We won the hackathon").await;
        assert_eq!(result, "🎉 We won! #hackathon");
    }

    #[tokio::test]
    async fn test_enhance_uses_short_post_params() {
        let p = provider(Some("ok"));
        let enhancer = ContentEnhancer::new(p.clone());
        enhancer.enhance("input").await;

        let seen = p.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].params.temperature, Some(ENHANCE_TEMPERATURE));
        assert_eq!(seen[0].params.thinking_budget, Some(ENHANCE_THINKING_BUDGET));
        assert_eq!(
            seen[0].params.max_output_tokens,
            Some(ENHANCE_MAX_OUTPUT_TOKENS)
        );
        assert!(seen[0].prompt.contains("\"input\""));
    }

    #[tokio::test]
    async fn test_enhance_falls_back_on_error() {
        let enhancer = ContentEnhancer::new(provider(None));
        let outcome = enhancer.enhance_outcome("We won the hackathon").await;
        assert_eq!(outcome, Outcome::Fallback("We won the hackathon".to_string()));
    }

    #[tokio::test]
    async fn test_enhance_falls_back_on_blank_generation() {
        let enhancer = ContentEnhancer::new(provider(Some("   ")));
        assert_eq!(enhancer.enhance("keep me").await, "keep me");
    }
}
