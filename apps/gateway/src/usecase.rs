//! # ユースケース層
//!
//! 配送可否照会と送料見積もりの処理手順を実装する。
//!
//! - **依存性注入**: 上流クライアントとトークンを構築時に外部から注入する
//! - **薄いハンドラ**: ハンドラは入力の整形とレスポンス変換のみを行う

pub mod rate;
pub mod serviceability;

pub use rate::RateUseCaseImpl;
pub use serviceability::ServiceabilityUseCaseImpl;
