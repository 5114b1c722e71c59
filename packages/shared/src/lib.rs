//! # shipquote 共有ユーティリティ
//!
//! gateway とテストで共通に使うユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - トレーシング関連は `observability` feature、OpenAPI スキーマは `openapi` feature で有効化する

#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod health;
pub mod observability;

pub use health::HealthResponse;
