//! Content Expander
//!
//! 短い投稿を長文投稿・スレッド・LinkedIn投稿へ展開する

use crate::content::{generate_or_fallback, prompts, thread::format_thread, Outcome};
use crate::llm::{GenerationParams, LlmProvider};
use crate::logging::truncate_for_log;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::error;

/// 展開の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionKind {
    /// 単一の長文投稿（500-800文字）
    LongPost,
    /// 5-7件のスレッド
    Thread,
    /// LinkedIn向け投稿（300-500語）
    #[serde(rename = "linkedin")]
    LinkedIn,
}

impl ExpansionKind {
    pub const ALL: [ExpansionKind; 3] = [
        ExpansionKind::LongPost,
        ExpansionKind::Thread,
        ExpansionKind::LinkedIn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpansionKind::LongPost => "long_post",
            ExpansionKind::Thread => "thread",
            ExpansionKind::LinkedIn => "linkedin",
        }
    }
}

impl fmt::Display for ExpansionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpansionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long_post" | "long-post" | "long" => Ok(ExpansionKind::LongPost),
            "thread" => Ok(ExpansionKind::Thread),
            "linkedin" | "linked_in" => Ok(ExpansionKind::LinkedIn),
            other => Err(format!(
                "unknown expansion kind '{}', expected one of: long_post, thread, linkedin",
                other
            )),
        }
    }
}

/// 展開結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Expansion {
    /// 単一の投稿
    Single(String),
    /// 番号付きスレッド
    Thread(Vec<String>),
}

impl Expansion {
    /// 表示用テキスト（スレッドは空行区切り）
    pub fn to_text(&self) -> String {
        match self {
            Expansion::Single(text) => text.clone(),
            Expansion::Thread(segments) => segments.join("\n\n"),
        }
    }
}

/// コンテンツ展開器
#[derive(Clone)]
pub struct ContentExpander {
    provider: Arc<dyn LlmProvider>,
    params: GenerationParams,
}

impl ContentExpander {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            params: GenerationParams::default(),
        }
    }

    /// 長文投稿へ展開。失敗時は入力をそのまま返す
    pub async fn expand_to_long_post(&self, original: &str) -> String {
        self.long_post_outcome(original).await.into_inner()
    }

    /// スレッドへ展開。失敗時は入力のみの1要素を返す
    pub async fn expand_to_thread(&self, original: &str) -> Vec<String> {
        self.thread_outcome(original).await.into_inner()
    }

    /// LinkedIn投稿へ展開。失敗時は入力をそのまま返す
    pub async fn expand_to_linkedin_post(&self, original: &str) -> String {
        self.linkedin_outcome(original).await.into_inner()
    }

    /// 種類を指定して展開
    pub async fn expand(&self, original: &str, kind: ExpansionKind) -> Expansion {
        self.expand_outcome(original, kind).await.into_inner()
    }

    /// 成功かフォールバックかを区別して展開
    pub async fn expand_outcome(&self, original: &str, kind: ExpansionKind) -> Outcome<Expansion> {
        match kind {
            ExpansionKind::LongPost => self.long_post_outcome(original).await.map(Expansion::Single),
            ExpansionKind::Thread => self.thread_outcome(original).await.map(Expansion::Thread),
            ExpansionKind::LinkedIn => self.linkedin_outcome(original).await.map(Expansion::Single),
        }
    }

    async fn long_post_outcome(&self, original: &str) -> Outcome<String> {
        generate_or_fallback(
            self.provider.as_ref(),
            "expand_to_long_post",
            original,
            prompts::long_post_prompt(original),
            self.params,
        )
        .await
    }

    async fn linkedin_outcome(&self, original: &str) -> Outcome<String> {
        generate_or_fallback(
            self.provider.as_ref(),
            "expand_to_linkedin_post",
            original,
            prompts::linkedin_prompt(original),
            self.params,
        )
        .await
    }

    async fn thread_outcome(&self, original: &str) -> Outcome<Vec<String>> {
        let generated = generate_or_fallback(
            self.provider.as_ref(),
            "expand_to_thread",
            original,
            prompts::thread_prompt(original),
            self.params,
        )
        .await;

        match generated {
            Outcome::Generated(text) => {
                let segments = format_thread(&text);
                if segments.is_empty() {
                    // 番号のみの出力などで本文が残らなかった
                    error!(
                        operation = "expand_to_thread",
                        input = %truncate_for_log(original),
                        "Generated thread had no usable segments; falling back to original content"
                    );
                    Outcome::Fallback(vec![original.to_string()])
                } else {
                    Outcome::Generated(segments)
                }
            }
            Outcome::Fallback(original) => Outcome::Fallback(vec![original]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("thread".parse::<ExpansionKind>(), Ok(ExpansionKind::Thread));
        assert_eq!(
            "Long_Post".parse::<ExpansionKind>(),
            Ok(ExpansionKind::LongPost)
        );
        assert_eq!(
            "linkedin".parse::<ExpansionKind>(),
            Ok(ExpansionKind::LinkedIn)
        );
        assert!("carousel".parse::<ExpansionKind>().is_err());
    }

    #[test]
    fn test_kind_round_trips_through_display() {
        for kind in ExpansionKind::ALL {
            assert_eq!(kind.to_string().parse::<ExpansionKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_kind_serde_names() {
        assert_eq!(
            serde_json::to_value(ExpansionKind::LinkedIn).unwrap(),
            "linkedin"
        );
        assert_eq!(
            serde_json::to_value(ExpansionKind::LongPost).unwrap(),
            "long_post"
        );
    }

    #[test]
    fn test_expansion_to_text() {
        let thread = Expansion::Thread(vec!["1/2 a".to_string(), "2/2 b".to_string()]);
        assert_eq!(thread.to_text(), "1/2 a\n\n2/2 b");
        assert_eq!(Expansion::Single("x".to_string()).to_text(), "x");
    }
}
