//! LLM統合の型定義

use serde::{Deserialize, Serialize};

/// 生成パラメータ
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// 温度パラメータ（0.0-2.0、未指定時はプロバイダー既定値）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// 最大出力トークン数（未指定時はプロバイダー既定値）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// 思考トークン予算（0で思考を無効化、未指定時はモデル既定）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_budget: Option<u32>,
}

impl GenerationParams {
    pub fn new(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            ..Self::default()
        }
    }

    /// 最大出力トークン数を設定
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }

    /// 思考トークン予算を設定
    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }
}

/// LLMリクエスト
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// 指示テキスト
    pub prompt: String,
    /// 使用するモデル（オプション）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// 生成パラメータ
    pub params: GenerationParams,
}

impl LlmRequest {
    /// 新しいリクエストを作成
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
            params: GenerationParams::default(),
        }
    }

    /// モデルを設定
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// 生成パラメータを設定
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }
}

/// LLMレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// 生成されたテキスト
    pub content: String,
    /// 使用されたモデル
    pub model: String,
    /// 使用トークン数
    pub usage: TokenUsage,
    /// 完了理由
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// トークン使用量
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TokenUsage {
    /// プロンプトトークン数
    pub prompt_tokens: usize,
    /// 完了トークン数
    pub completion_tokens: usize,
    /// 合計トークン数
    pub total_tokens: usize,
}

impl TokenUsage {
    /// 新しいトークン使用量を作成
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}
