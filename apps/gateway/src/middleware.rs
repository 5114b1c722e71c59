//! # ミドルウェア
//!
//! gateway 用のミドルウェアを提供する。

pub mod cache_control;
pub mod origin;
pub mod request_id;

pub use cache_control::no_cache;
pub use origin::{OriginPolicy, OriginState, origin_policy};
