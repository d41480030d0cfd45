//! Google Gemini API Integration
//!
//! `models/{model}:generateContent` エンドポイントを利用したテキスト生成

use crate::llm::{
    config::LlmConfig,
    error::{LlmError, LlmResult},
    providers::LlmProvider,
    types::{LlmRequest, LlmResponse, TokenUsage},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Geminiプロバイダー
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    config: LlmConfig,
}

impl GeminiProvider {
    /// 新しいGeminiプロバイダーを作成
    pub fn new(config: LlmConfig) -> LlmResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("mcp-social/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LlmError::ConfigError(format!("HTTP client build failed: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint_for(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint_or_default(),
            model
        )
    }

    fn model_for<'a>(&'a self, request: &'a LlmRequest) -> &'a str {
        request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model)
    }

    /// リクエストボディを構築
    ///
    /// 未指定のパラメータは設定値（`default_temperature`、`default_max_tokens`）で補う。
    fn build_body(&self, request: &LlmRequest) -> GenerateContentRequest {
        let params = &request.params;
        let temperature = params
            .temperature
            .unwrap_or(self.config.default_temperature);
        let max_output_tokens = params
            .max_output_tokens
            .unwrap_or(self.config.default_max_tokens);

        // 思考予算は 2.5 Flash 系のみ 0 まで下げられる
        let thinking_config = params
            .thinking_budget
            .filter(|_| accepts_thinking_budget(self.model_for(request)))
            .map(|thinking_budget| ThinkingConfig { thinking_budget });

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.prompt.clone()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens,
                thinking_config,
            },
        }
    }

    fn map_transport_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.config.timeout_secs)
        } else if err.is_decode() {
            LlmError::HttpError(err.to_string())
        } else {
            LlmError::NetworkError(err.to_string())
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, request: &LlmRequest) -> LlmResult<LlmResponse> {
        let model = self.model_for(request).to_string();

        let api_key = self
            .config
            .get_api_key()
            .ok_or_else(|| LlmError::ConfigError("API key is required".to_string()))?;

        debug!(model = %model, prompt_len = request.prompt.len(), "Gemini generateContent");

        let response = self
            .client
            .post(self.endpoint_for(&model))
            .header("x-goog-api-key", api_key)
            .json(&self.build_body(request))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let api_response: GenerateContentResponse = serde_json::from_str(&body)?;

        let candidate = api_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::EmptyResponse("No candidates in Gemini response".to_string()))?;

        let content: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LlmError::EmptyResponse(format!(
                "Gemini returned no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        if candidate.finish_reason.as_deref() != Some("STOP") {
            warn!(
                model = %model,
                finish_reason = candidate.finish_reason.as_deref().unwrap_or("unknown"),
                "Gemini output may be truncated"
            );
        }

        let usage = api_response
            .usage_metadata
            .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            model: api_response.model_version.unwrap_or(model),
            usage,
            finish_reason: candidate.finish_reason,
        })
    }

    fn name(&self) -> &str {
        "Gemini"
    }

    fn supported_models(&self) -> Vec<String> {
        vec![
            "gemini-2.5-pro".to_string(),
            "gemini-2.5-flash".to_string(),
            "gemini-2.5-flash-lite".to_string(),
            "gemini-2.0-flash".to_string(),
            "gemini-1.5-pro".to_string(),
            "gemini-1.5-flash".to_string(),
        ]
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

fn accepts_thinking_budget(model: &str) -> bool {
    model.starts_with("gemini-2.5-flash")
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}
