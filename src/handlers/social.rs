//! Social posting handler
//!
//! コンテンツ強化・展開と投稿プロバイダーをMCPツールとして公開します。

use crate::content::{ContentEnhancer, ContentExpander, Expansion, ExpansionKind};
use crate::content::prompts::TWEET_CHAR_LIMIT;
use crate::llm::LlmProvider;
use crate::mcp::{
    InitializeParams, McpError, McpHandler, Resource, ResourceReadParams, Tool, ToolCallParams,
    PROTOCOL_VERSION,
};
use crate::posting::{PostPublisher, PublishedPost};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const SERVER_NAME: &str = "mcp-social";
pub const TOOLS_GUIDE_URI: &str = "social://tools-guide";

const TOOLS_GUIDE: &str = "# mcp-social tools

## create_post
Enhance a short status with AI (emojis, hashtags, hook) and post it to X.
- `status` (string, required)
- `enhance_with_ai` (boolean, default true): post the status verbatim when false

## preview_enhanced_content
Show the enhanced text and its character count without posting.
- `status` (string, required)

## expand_content
Expand a status into a long post, a numbered thread, or a LinkedIn post.
- `status` (string, required)
- `kind` (`long_post` | `thread` | `linkedin`, required)

## post_thread
Expand a status into a thread and post every segment as a reply chain.
- `status` (string, required)

When AI generation fails the original text is used unchanged.
";

/// SNS投稿ハンドラー
pub struct SocialHandler {
    enhancer: ContentEnhancer,
    expander: ContentExpander,
    publisher: Option<Arc<dyn PostPublisher>>,
}

impl SocialHandler {
    pub fn new(provider: Arc<dyn LlmProvider>, publisher: Option<Arc<dyn PostPublisher>>) -> Self {
        Self {
            enhancer: ContentEnhancer::new(Arc::clone(&provider)),
            expander: ContentExpander::new(provider),
            publisher,
        }
    }

    fn publisher(&self) -> Result<&Arc<dyn PostPublisher>, String> {
        self.publisher
            .as_ref()
            .ok_or_else(|| "Twitter credentials are not configured".to_string())
    }

    async fn create_post(&self, status: &str, enhance_with_ai: bool) -> Value {
        let publisher = match self.publisher() {
            Ok(publisher) => publisher,
            Err(message) => return text_result(format!("❌ Error: {}", message), true),
        };

        let final_content = if enhance_with_ai {
            let outcome = self.enhancer.enhance_outcome(status).await;
            if outcome.is_fallback() {
                warn!("Posting original content because enhancement failed");
            }
            outcome.into_inner()
        } else {
            status.to_string()
        };

        match publisher.post(&final_content).await {
            Ok(post) => text_result(
                format!(
                    "✅ Tweet Posted Successfully!\n\nOriginal: {}\n\nEnhanced: {}\n\nTweet ID: {}",
                    status, final_content, post.id
                ),
                false,
            ),
            Err(e) => {
                error!("Twitter API Error: {}", e);
                text_result(format!("❌ Error: {}", e.detail()), true)
            }
        }
    }

    async fn preview(&self, status: &str) -> Value {
        let enhanced = self.enhancer.enhance(status).await;
        text_result(
            format!(
                "📝 Content Preview:\n\n🔸 Original: {}\n\n🔸 Enhanced: {}\n\nCharacter count: {}/{}",
                status,
                enhanced,
                enhanced.chars().count(),
                TWEET_CHAR_LIMIT
            ),
            false,
        )
    }

    async fn expand(&self, status: &str, kind: ExpansionKind) -> Value {
        let outcome = self.expander.expand_outcome(status, kind).await;
        let fallback = outcome.is_fallback();
        let expansion = outcome.into_inner();

        let mut result = text_result(expansion.to_text(), false);
        result["structuredContent"] = serde_json::json!({
            "kind": kind,
            "fallback": fallback,
            "expansion": expansion,
        });
        result
    }

    async fn post_thread(&self, status: &str) -> Value {
        let publisher = match self.publisher() {
            Ok(publisher) => publisher,
            Err(message) => return text_result(format!("❌ Error: {}", message), true),
        };

        let segments = self.expander.expand_to_thread(status).await;
        let mut posted: Vec<PublishedPost> = Vec::with_capacity(segments.len());

        for segment in &segments {
            let result = match posted.last() {
                Some(previous) => publisher.reply(segment, &previous.id).await,
                None => publisher.post(segment).await,
            };

            match result {
                Ok(post) => posted.push(post),
                Err(e) => {
                    error!(
                        posted = posted.len(),
                        total = segments.len(),
                        "Thread posting stopped: {}",
                        e
                    );
                    return text_result(
                        format!(
                            "❌ Error: {}\n\nPosted {}/{} segments. Tweet IDs: {}",
                            e.detail(),
                            posted.len(),
                            segments.len(),
                            join_ids(&posted)
                        ),
                        true,
                    );
                }
            }
        }

        info!(segments = posted.len(), "Thread posted");
        text_result(
            format!(
                "✅ Thread Posted Successfully!\n\n{}\n\nTweet IDs: {}",
                segments.join("\n\n"),
                join_ids(&posted)
            ),
            false,
        )
    }
}

fn join_ids(posts: &[PublishedPost]) -> String {
    if posts.is_empty() {
        return "none".to_string();
    }
    posts
        .iter()
        .map(|p| p.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn text_result(text: String, is_error: bool) -> Value {
    serde_json::json!({
        "content": [{
            "type": "text",
            "text": text
        }],
        "isError": is_error
    })
}

fn required_str(args: &HashMap<String, Value>, key: &str) -> Result<String, McpError> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(McpError::InvalidParams(format!("{} must be a string", key))),
        None => Err(McpError::InvalidParams(format!("{} is required", key))),
    }
}

fn optional_bool(
    args: &HashMap<String, Value>,
    keys: &[&str],
    default: bool,
) -> Result<bool, McpError> {
    match keys.iter().find_map(|key| args.get(*key)) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(McpError::InvalidParams(format!(
            "{} must be a boolean",
            keys[0]
        ))),
    }
}

fn status_schema() -> Value {
    serde_json::json!({
        "type": "string",
        "description": "The basic content you want to post about"
    })
}

#[async_trait]
impl McpHandler for SocialHandler {
    async fn initialize(&self, params: InitializeParams) -> Result<Value, McpError> {
        if let Some(client) = &params.client_info {
            info!(client = %client.name, version = %client.version, "Client connected");
        }
        info!("Social MCP Handler initialized");
        Ok(serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {
                    "listChanged": false
                },
                "resources": {
                    "subscribe": false,
                    "listChanged": false
                }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        }))
    }

    async fn list_tools(&self) -> Result<Vec<Tool>, McpError> {
        Ok(vec![
            Tool {
                name: "create_post".to_string(),
                description: "Create an AI-enhanced post on X (formerly Twitter). The content will be automatically enhanced with engaging language, emojis, and relevant hashtags.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "status": status_schema(),
                        "enhance_with_ai": {
                            "type": "boolean",
                            "description": "Whether to enhance the content with AI (default: true)",
                            "default": true
                        }
                    },
                    "required": ["status"]
                }),
            },
            Tool {
                name: "preview_enhanced_content".to_string(),
                description: "Preview how your content will be enhanced by AI without posting to X".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "status": status_schema()
                    },
                    "required": ["status"]
                }),
            },
            Tool {
                name: "expand_content".to_string(),
                description: "Expand short content into a long post, a numbered thread, or a LinkedIn post".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "status": status_schema(),
                        "kind": {
                            "type": "string",
                            "enum": ExpansionKind::ALL.iter().map(|k| k.as_str()).collect::<Vec<_>>(),
                            "description": "Output format"
                        }
                    },
                    "required": ["status", "kind"]
                }),
            },
            Tool {
                name: "post_thread".to_string(),
                description: "Expand content into a thread and post it to X as a reply chain".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "status": status_schema()
                    },
                    "required": ["status"]
                }),
            },
        ])
    }

    async fn call_tool(&self, params: ToolCallParams) -> Result<Value, McpError> {
        let args = params.arguments.unwrap_or_default();

        match params.name.as_str() {
            "create_post" => {
                let status = required_str(&args, "status")?;
                let enhance = optional_bool(&args, &["enhance_with_ai", "enhanceWithAI"], true)?;
                Ok(self.create_post(&status, enhance).await)
            }
            "preview_enhanced_content" => {
                let status = required_str(&args, "status")?;
                Ok(self.preview(&status).await)
            }
            "expand_content" => {
                let status = required_str(&args, "status")?;
                let kind: ExpansionKind = required_str(&args, "kind")?
                    .parse()
                    .map_err(McpError::InvalidParams)?;
                Ok(self.expand(&status, kind).await)
            }
            "post_thread" => {
                let status = required_str(&args, "status")?;
                Ok(self.post_thread(&status).await)
            }
            _ => Err(McpError::ToolNotFound(params.name)),
        }
    }

    async fn list_resources(&self) -> Result<Vec<Resource>, McpError> {
        Ok(vec![Resource {
            uri: TOOLS_GUIDE_URI.to_string(),
            name: "Social Tools Guide".to_string(),
            description: Some("How to use the social posting tools".to_string()),
            mime_type: Some("text/markdown".to_string()),
        }])
    }

    async fn read_resource(&self, params: ResourceReadParams) -> Result<Value, McpError> {
        match params.uri.as_str() {
            TOOLS_GUIDE_URI => Ok(serde_json::json!({
                "contents": [{
                    "uri": params.uri,
                    "mimeType": "text/markdown",
                    "text": TOOLS_GUIDE
                }]
            })),
            _ => Err(McpError::ResourceNotFound(params.uri)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmResult, TokenUsage};
    use crate::posting::{MockPostPublisher, PostingError};
    use mockall::Sequence;

    /// 固定の応答を返すプロバイダー（Noneなら常に失敗）
    struct FixedProvider(Option<&'static str>);

    #[async_trait]
    impl LlmProvider for FixedProvider {
        async fn generate(&self, _request: &LlmRequest) -> LlmResult<LlmResponse> {
            match self.0 {
                Some(text) => Ok(LlmResponse {
                    content: text.to_string(),
                    model: "fixed".to_string(),
                    usage: TokenUsage::new(1, 1),
                    finish_reason: Some("STOP".to_string()),
                }),
                None => Err(LlmError::NetworkError("offline".to_string())),
            }
        }

        fn name(&self) -> &str {
            "fixed"
        }

        fn supported_models(&self) -> Vec<String> {
            vec!["fixed".to_string()]
        }
    }

    fn handler(reply: Option<&'static str>, publisher: Option<MockPostPublisher>) -> SocialHandler {
        SocialHandler::new(
            Arc::new(FixedProvider(reply)),
            publisher.map(|p| Arc::new(p) as Arc<dyn PostPublisher>),
        )
    }

    fn call(name: &str, args: Value) -> ToolCallParams {
        ToolCallParams {
            name: name.to_string(),
            arguments: serde_json::from_value(args).unwrap(),
        }
    }

    fn text_of(result: &Value) -> &str {
        result["content"][0]["text"].as_str().unwrap()
    }

    #[tokio::test]
    async fn test_create_post_enhances_then_posts() {
        let mut publisher = MockPostPublisher::new();
        publisher
            .expect_post()
            .withf(|text| text == "Shipping v2 today 🚀 #rust")
            .times(1)
            .returning(|text| {
                Ok(PublishedPost {
                    id: "1800".to_string(),
                    text: text.to_string(),
                })
            });

        let handler = handler(Some("  Shipping v2 today 🚀 #rust  "), Some(publisher));
        let result = handler
            .call_tool(call("create_post", serde_json::json!({"status": "shipping v2"})))
            .await
            .unwrap();

        assert_eq!(
            text_of(&result),
            "✅ Tweet Posted Successfully!\n\nOriginal: shipping v2\n\nEnhanced: Shipping v2 today 🚀 #rust\n\nTweet ID: 1800"
        );
        assert_eq!(result["isError"], false);
    }

    #[tokio::test]
    async fn test_create_post_without_enhancement_posts_verbatim() {
        let mut publisher = MockPostPublisher::new();
        publisher
            .expect_post()
            .withf(|text| text == "raw text")
            .times(1)
            .returning(|text| {
                Ok(PublishedPost {
                    id: "7".to_string(),
                    text: text.to_string(),
                })
            });

        let handler = handler(Some("should not be used"), Some(publisher));
        let result = handler
            .call_tool(call(
                "create_post",
                serde_json::json!({"status": "raw text", "enhance_with_ai": false}),
            ))
            .await
            .unwrap();

        assert!(text_of(&result).contains("Enhanced: raw text"));
    }

    #[tokio::test]
    async fn test_create_post_falls_back_when_generation_fails() {
        let mut publisher = MockPostPublisher::new();
        publisher
            .expect_post()
            .withf(|text| text == "hello")
            .times(1)
            .returning(|text| {
                Ok(PublishedPost {
                    id: "9".to_string(),
                    text: text.to_string(),
                })
            });

        let handler = handler(None, Some(publisher));
        let result = handler
            .call_tool(call("create_post", serde_json::json!({"status": "hello"})))
            .await
            .unwrap();

        assert!(text_of(&result).contains("Enhanced: hello"));
        assert_eq!(result["isError"], false);
    }

    #[tokio::test]
    async fn test_create_post_reports_publisher_error() {
        let mut publisher = MockPostPublisher::new();
        publisher.expect_post().returning(|_| {
            Err(PostingError::ApiError {
                status: 403,
                message: "duplicate content".to_string(),
            })
        });

        let handler = handler(Some("enhanced"), Some(publisher));
        let result = handler
            .call_tool(call("create_post", serde_json::json!({"status": "x"})))
            .await
            .unwrap();

        assert_eq!(text_of(&result), "❌ Error: duplicate content");
        assert_eq!(result["isError"], true);
    }

    #[tokio::test]
    async fn test_create_post_without_publisher() {
        let handler = handler(Some("enhanced"), None);
        let result = handler
            .call_tool(call("create_post", serde_json::json!({"status": "x"})))
            .await
            .unwrap();

        assert!(text_of(&result).starts_with("❌ Error:"));
        assert_eq!(result["isError"], true);
    }

    #[tokio::test]
    async fn test_preview_counts_characters() {
        let handler = handler(Some("café ☕ #morning"), None);
        let result = handler
            .call_tool(call(
                "preview_enhanced_content",
                serde_json::json!({"status": "coffee"}),
            ))
            .await
            .unwrap();

        assert_eq!(
            text_of(&result),
            "📝 Content Preview:\n\n🔸 Original: coffee\n\n🔸 Enhanced: café ☕ #morning\n\nCharacter count: 15/280"
        );
    }

    #[tokio::test]
    async fn test_expand_thread_has_structured_segments() {
        let handler = handler(Some("1/2 First part 2/2 Second part"), None);
        let result = handler
            .call_tool(call(
                "expand_content",
                serde_json::json!({"status": "topic", "kind": "thread"}),
            ))
            .await
            .unwrap();

        assert_eq!(text_of(&result), "1/2 First part\n\n2/2 Second part");
        assert_eq!(result["structuredContent"]["kind"], "thread");
        assert_eq!(result["structuredContent"]["fallback"], false);
        assert_eq!(
            result["structuredContent"]["expansion"]["content"],
            serde_json::json!(["1/2 First part", "2/2 Second part"])
        );
    }

    #[tokio::test]
    async fn test_expand_rejects_unknown_kind() {
        let handler = handler(Some("x"), None);
        let err = handler
            .call_tool(call(
                "expand_content",
                serde_json::json!({"status": "topic", "kind": "poem"}),
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, McpError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn test_post_thread_chains_replies() {
        let mut seq = Sequence::new();
        let mut publisher = MockPostPublisher::new();
        publisher
            .expect_post()
            .withf(|text| text == "1/2 First")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|text| {
                Ok(PublishedPost {
                    id: "100".to_string(),
                    text: text.to_string(),
                })
            });
        publisher
            .expect_reply()
            .withf(|text, in_reply_to| text == "2/2 Second" && in_reply_to == "100")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|text, _| {
                Ok(PublishedPost {
                    id: "101".to_string(),
                    text: text.to_string(),
                })
            });

        let handler = handler(Some("1/2 First 2/2 Second"), Some(publisher));
        let result = handler
            .call_tool(call("post_thread", serde_json::json!({"status": "topic"})))
            .await
            .unwrap();

        assert!(text_of(&result).ends_with("Tweet IDs: 100, 101"));
        assert_eq!(result["isError"], false);
    }

    #[tokio::test]
    async fn test_post_thread_stops_at_first_failure() {
        let mut publisher = MockPostPublisher::new();
        publisher.expect_post().times(1).returning(|text| {
            Ok(PublishedPost {
                id: "100".to_string(),
                text: text.to_string(),
            })
        });
        publisher
            .expect_reply()
            .times(1)
            .returning(|_, _| Err(PostingError::RateLimitError("Too Many Requests".to_string())));

        let handler = handler(Some("1/3 a 2/3 b 3/3 c"), Some(publisher));
        let result = handler
            .call_tool(call("post_thread", serde_json::json!({"status": "topic"})))
            .await
            .unwrap();

        assert_eq!(
            text_of(&result),
            "❌ Error: Too Many Requests\n\nPosted 1/3 segments. Tweet IDs: 100"
        );
        assert_eq!(result["isError"], true);
    }

    #[tokio::test]
    async fn test_missing_status_is_invalid_params() {
        let handler = handler(Some("x"), None);
        let err = handler
            .call_tool(call("preview_enhanced_content", serde_json::json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let handler = handler(Some("x"), None);
        let err = handler
            .call_tool(call("addTwoNumbers", serde_json::json!({"a": 1, "b": 2})))
            .await
            .unwrap_err();
        assert!(matches!(err, McpError::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_tools_guide_resource() {
        let handler = handler(Some("x"), None);
        let resources = handler.list_resources().await.unwrap();
        assert_eq!(resources[0].uri, TOOLS_GUIDE_URI);

        let read = handler
            .read_resource(ResourceReadParams {
                uri: TOOLS_GUIDE_URI.to_string(),
            })
            .await
            .unwrap();
        assert!(read["contents"][0]["text"]
            .as_str()
            .unwrap()
            .contains("post_thread"));

        let missing = handler
            .read_resource(ResourceReadParams {
                uri: "social://nope".to_string(),
            })
            .await;
        assert!(matches!(missing, Err(McpError::ResourceNotFound(_))));
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let handler = handler(Some("x"), None);
        let result = handler.initialize(InitializeParams::default()).await.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
    }
}
