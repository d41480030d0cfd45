//! 指示テンプレート
//!
//! 各テンプレートはバリアント種別と入力テキストのみから決定されます。

/// ツイートの最大文字数
pub const TWEET_CHAR_LIMIT: usize = 280;

/// スレッド内の各ツイートの最大文字数（番号表記の余白を残す）
pub const THREAD_PART_CHAR_LIMIT: usize = 270;

/// 単一ツイートへの強化用テンプレート
pub fn enhance_prompt(original: &str) -> String {
    format!(
        r#"You are a professional social media content creator specializing in Twitter posts. Your task is to take a brief input and expand it into an engaging, well-structured tweet that maximizes engagement.

Guidelines:
- Expand the content with relevant details and context
- Add appropriate emojis to make it more engaging
- Include relevant hashtags (3-5 maximum)
- Keep it under {limit} characters total
- Make it compelling and shareable
- Maintain the original message's intent
- Use engaging language that encourages interaction

Original content: "{original}"

Create an enhanced tweet:"#,
        limit = TWEET_CHAR_LIMIT,
        original = original,
    )
}

/// 長文投稿用テンプレート
pub fn long_post_prompt(original: &str) -> String {
    format!(
        r#"You are a professional social media content creator. Take this brief post and expand it into a compelling, longer social media post that tells a complete story.

Original post: "{original}"

Create an expanded version that:
- Tells the complete story with context and background
- Adds personal insights and emotions
- Includes specific details about the achievement
- Mentions the journey and the process
- Adds inspirational elements
- Uses engaging language with appropriate emojis
- Includes relevant hashtags (5-7 maximum)
- Maintains authenticity and excitement
- Keeps it between 500-800 characters total

Format as a single cohesive post, not a thread."#
    )
}

/// スレッド用テンプレート
pub fn thread_prompt(original: &str) -> String {
    format!(
        r#"Create a Twitter thread (5-7 tweets) expanding this post. Each tweet should build on the previous one to tell a complete story.

Original post: "{original}"

Structure:
1. Hook tweet (exciting announcement)
2. Context (what this is about)
3. Background (who is involved and why it matters)
4. Journey/process (how it came together)
5. What's next (what to look forward to)
6. Call to action (inspirational closing)
7. Thank you and hashtags

Each tweet must be under {limit} characters. Number each tweet (1/7, 2/7, etc.). Use emojis and engaging language."#,
        limit = THREAD_PART_CHAR_LIMIT,
        original = original,
    )
}

/// LinkedIn投稿用テンプレート
pub fn linkedin_prompt(original: &str) -> String {
    format!(
        r#"Transform this Twitter post into a professional LinkedIn post suitable for the tech and startup community.

Original post: "{original}"

Create a LinkedIn version that:
- Uses a professional but enthusiastic tone
- Includes business and career insights
- Mentions team collaboration
- Discusses innovation and industry trends
- Adds value for a professional network
- Uses professional emojis sparingly
- Includes relevant LinkedIn hashtags
- Is 300-500 words long
- Starts with a compelling hook
- Ends with an engagement question

Focus on the professional achievement and its industry implications."#
    )
}
