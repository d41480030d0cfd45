//! スレッド分割
//!
//! 生成テキストを `k/n` 形式の番号で分割し、番号を振り直します。
//! プロバイダーが出力した番号は信用せず、区切りとしてのみ使用します。

use regex::Regex;
use std::sync::LazyLock;

static THREAD_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+/[0-9]+").expect("thread marker pattern is valid"));

/// 生成テキストを番号付きセグメントへ整形する
///
/// 最初の番号より前のテキストも（空でなければ）1番目のセグメントになる。
/// 番号が一つもなければ全体が1つのセグメントになる。入力が空白のみなら空の `Vec`。
pub fn format_thread(generated: &str) -> Vec<String> {
    let segments: Vec<&str> = THREAD_MARKER
        .split(generated)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();

    let total = segments.len();
    segments
        .into_iter()
        .enumerate()
        .map(|(index, segment)| format!("{}/{} {}", index + 1, total, segment))
        .collect()
}
