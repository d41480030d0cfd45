//! 生成結果の型

use serde::{Deserialize, Serialize};

/// 生成操作の結果
///
/// どちらの場合も有効な値を保持する。公開APIの境界で [`Outcome::into_inner`] により
/// 値へ畳み込まれる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// 生成に成功
    Generated(T),
    /// 生成に失敗し、元の入力から作った値
    Fallback(T),
}

impl<T> Outcome<T> {
    /// 値を取り出す
    pub fn into_inner(self) -> T {
        match self {
            Outcome::Generated(value) | Outcome::Fallback(value) => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback(_))
    }

    /// 種別を保ったまま値を変換
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Generated(value) => Outcome::Generated(f(value)),
            Outcome::Fallback(value) => Outcome::Fallback(f(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_inner() {
        assert_eq!(Outcome::Generated("a").into_inner(), "a");
        assert_eq!(Outcome::Fallback("b").into_inner(), "b");
    }

    #[test]
    fn test_map_preserves_kind() {
        let mapped = Outcome::Fallback(2).map(|v| v * 10);
        assert_eq!(mapped, Outcome::Fallback(20));
        assert!(mapped.is_fallback());

        let mapped = Outcome::Generated("x").map(str::len);
        assert_eq!(mapped, Outcome::Generated(1));
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(Outcome::Generated("hi")).unwrap();
        assert_eq!(json["outcome"], "generated");
        assert_eq!(json["value"], "hi");
    }
}
