//! Handler implementations
//!
//! 共通のMcpHandlerトレイトを実装するハンドラーを提供します。

pub mod social;

pub use social::*;
