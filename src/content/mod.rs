//! Content Generation Module
//!
//! 短いプロンプトをSNS投稿（単一ツイート、スレッド、長文、LinkedIn投稿）へ
//! 拡張する機能を提供します。生成に失敗した場合は常に元の入力へフォールバックし、
//! エラーは呼び出し元へ伝播しません。

pub mod enhancer;
pub mod expander;
pub mod outcome;
pub mod prompts;
pub mod thread;

pub use enhancer::ContentEnhancer;
pub use expander::{ContentExpander, Expansion, ExpansionKind};
pub use outcome::Outcome;
pub use thread::format_thread;

use crate::llm::{GenerationParams, LlmProvider, LlmRequest};
use crate::logging::truncate_for_log;
use tracing::{debug, error};

/// 生成を1回だけ試行し、失敗時は元の入力を返す
///
/// 空文字列（トリム後）の生成結果も失敗として扱う。
pub(crate) async fn generate_or_fallback(
    provider: &dyn LlmProvider,
    operation: &'static str,
    raw_input: &str,
    prompt: String,
    params: GenerationParams,
) -> Outcome<String> {
    let request = LlmRequest::new(prompt).with_params(params);

    match provider.generate(&request).await {
        Ok(response) => {
            let text = response.content.trim();
            if text.is_empty() {
                error!(
                    operation,
                    input = %truncate_for_log(raw_input),
                    "Generation returned empty text; falling back to original content"
                );
                return Outcome::Fallback(raw_input.to_string());
            }
            debug!(
                operation,
                provider = provider.name(),
                model = %response.model,
                tokens = response.usage.total_tokens,
                "Generation succeeded"
            );
            Outcome::Generated(text.to_string())
        }
        Err(e) => {
            error!(
                operation,
                provider = provider.name(),
                input = %truncate_for_log(raw_input),
                error = %e,
                "Generation failed; falling back to original content"
            );
            Outcome::Fallback(raw_input.to_string())
        }
    }
}
