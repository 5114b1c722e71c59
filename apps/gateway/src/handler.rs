//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! - 各ハンドラはサブモジュールに配置し、親モジュールで re-export する
//! - ハンドラは入力の整形とレスポンス変換のみを行い、処理はユースケースに委譲する
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック
//! - `pincode`: 配送可否照会
//! - `rate`: 送料見積もり

pub mod health;
pub mod pincode;
pub mod rate;

pub use health::health_check;
pub use pincode::{ServiceabilityState, check_pincode};
pub use rate::{RateState, get_rate};
