//! X (Twitter) API v2 publisher

use crate::posting::{
    error::{PostingError, PostingResult},
    oauth::{authorization_header, OAuthCredentials},
    PostPublisher, PublishedPost,
};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

pub const TWITTER_DEFAULT_BASE_URL: &str = "https://api.twitter.com";

/// X API 認証情報と接続設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    /// Consumer key
    #[serde(skip_serializing, default)]
    pub api_key: Option<SecretString>,
    /// Consumer secret
    #[serde(skip_serializing, default)]
    pub api_secret: Option<SecretString>,
    #[serde(skip_serializing, default)]
    pub access_token: Option<SecretString>,
    #[serde(skip_serializing, default)]
    pub access_token_secret: Option<SecretString>,
    /// APIベースURL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// リクエストタイムアウト（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    TWITTER_DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            access_token: None,
            access_token_secret: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl TwitterConfig {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Self {
        let secret = |value: String| Some(SecretString::new(value.into_boxed_str()));
        Self {
            api_key: secret(api_key.into()),
            api_secret: secret(api_secret.into()),
            access_token: secret(access_token.into()),
            access_token_secret: secret(access_token_secret.into()),
            ..Self::default()
        }
    }

    /// 環境変数から読み込み
    pub fn from_env() -> PostingResult<Self> {
        let var = |key: &str| {
            std::env::var(key).map_err(|_| PostingError::ConfigError(format!("{} not set", key)))
        };

        let config = Self::new(
            var("TWITTER_API_KEY")?,
            var("TWITTER_API_SECRET")?,
            var("TWITTER_ACCESS_TOKEN")?,
            var("TWITTER_ACCESS_TOKEN_SECRET")?,
        );
        config.validate()?;
        Ok(config)
    }

    /// ベースURLを設定
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 認証情報がすべて揃っているか検証
    pub fn validate(&self) -> PostingResult<()> {
        let fields = [
            ("api_key", &self.api_key),
            ("api_secret", &self.api_secret),
            ("access_token", &self.access_token),
            ("access_token_secret", &self.access_token_secret),
        ];

        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| {
                value
                    .as_ref()
                    .map(|v| v.expose_secret().trim().is_empty())
                    .unwrap_or(true)
            })
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(PostingError::ConfigError(format!(
                "missing Twitter credentials: {}",
                missing.join(", ")
            )));
        }

        if self.timeout_secs == 0 {
            return Err(PostingError::ConfigError(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    fn secret(value: &Option<SecretString>) -> &str {
        value.as_ref().map(|v| v.expose_secret()).unwrap_or_default()
    }

    fn credentials(&self) -> OAuthCredentials<'_> {
        OAuthCredentials {
            consumer_key: Self::secret(&self.api_key),
            consumer_secret: Self::secret(&self.api_secret),
            token: Self::secret(&self.access_token),
            token_secret: Self::secret(&self.access_token_secret),
        }
    }
}

/// X API v2 `POST /2/tweets` を使う投稿プロバイダー
#[derive(Debug, Clone)]
pub struct TwitterPublisher {
    client: Client,
    config: TwitterConfig,
}

impl TwitterPublisher {
    pub fn new(config: TwitterConfig) -> PostingResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("mcp-social/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PostingError::ConfigError(format!("HTTP client build failed: {}", e)))?;

        Ok(Self { client, config })
    }

    fn tweets_url(&self) -> String {
        format!("{}/2/tweets", self.config.base_url.trim_end_matches('/'))
    }

    fn map_transport_error(&self, err: reqwest::Error) -> PostingError {
        if err.is_timeout() {
            PostingError::Timeout(self.config.timeout_secs)
        } else {
            PostingError::NetworkError(err.to_string())
        }
    }
}

/// エラーレスポンスから説明を取り出す
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .detail
            .or(parsed.title)
            .or_else(|| parsed.errors.into_iter().find_map(|e| e.message))
            .unwrap_or_else(|| body.to_string()),
        Err(_) => body.to_string(),
    }
}

impl TwitterPublisher {
    async fn create_tweet(
        &self,
        text: &str,
        in_reply_to: Option<&str>,
    ) -> PostingResult<PublishedPost> {
        let url = self.tweets_url();
        let auth = authorization_header(&self.config.credentials(), "POST", &url, &[]);
        let request = CreateTweetRequest {
            text,
            reply: in_reply_to.map(|id| ReplySettings {
                in_reply_to_tweet_id: id,
            }),
        };

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            let detail = error_detail(&body);
            warn!(status = status.as_u16(), detail = %detail, "Twitter API rejected post");
            return Err(match status.as_u16() {
                401 => PostingError::AuthError(detail),
                429 => PostingError::RateLimitError(detail),
                code => PostingError::ApiError {
                    status: code,
                    message: detail,
                },
            });
        }

        let created: CreateTweetResponse = serde_json::from_str(&body)?;
        let data = created
            .data
            .ok_or_else(|| PostingError::InvalidResponse(format!("missing data: {}", body)))?;

        info!(tweet_id = %data.id, in_reply_to = ?in_reply_to, "Tweet posted");

        Ok(PublishedPost {
            id: data.id,
            text: data.text.unwrap_or_else(|| text.to_string()),
        })
    }
}

#[async_trait]
impl PostPublisher for TwitterPublisher {
    async fn post(&self, text: &str) -> PostingResult<PublishedPost> {
        self.create_tweet(text, None).await
    }

    async fn reply(&self, text: &str, in_reply_to: &str) -> PostingResult<PublishedPost> {
        self.create_tweet(text, Some(in_reply_to)).await
    }
}

#[derive(Debug, Serialize)]
struct CreateTweetRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<ReplySettings<'a>>,
}

#[derive(Debug, Serialize)]
struct ReplySettings<'a> {
    in_reply_to_tweet_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: Option<TweetData>,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    title: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    message: Option<String>,
}
