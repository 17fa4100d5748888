//! Data Transfer Objects for the chat wire protocol.
//!
//! ## 概要
//!
//! ドメインモデル（`ChatMessage`）とワイヤ形式（JSON）を分離するための型です。
//! 変換ロジックは `conversion` モジュールにあります。

pub mod conversion;
pub mod websocket;
