//! LLM統合システム
//!
//! テキスト生成プロバイダー（Google Gemini）との統合機能を提供します。
//! コンテンツ層はこのモジュールの [`LlmProvider`] トレイトにのみ依存します。

pub mod config;
pub mod error;
pub mod providers;
pub mod types;

pub use config::{LlmConfig, ProviderKind};
pub use error::{LlmError, LlmResult};
pub use providers::{create_provider, gemini::GeminiProvider, LlmProvider};
pub use types::{GenerationParams, LlmRequest, LlmResponse, TokenUsage};
