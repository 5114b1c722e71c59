//! # shipquote ドメイン層
//!
//! 配送可否判定と送料計算のビジネスルールを定義する。
//!
//! ## 設計方針
//!
//! - **値オブジェクト**: 入力値をラップし、生成時に検証する（例: [`Pincode`]）
//! - **純粋な計算**: 上流 API や HTTP に依存しない。入出力はすべて値
//! - **ドメインエラー**: ルール違反は [`DomainError`] で表現する
//!
//! ## 依存関係の方向
//!
//! ```text
//! gateway → domain
//!    └────→ shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメインエラー
//! - [`pincode`] - PIN コードと照会種別
//! - [`serviceability`] - 配送可否の判定ルール
//! - [`pricing`] - 送料のマークアップ計算と内訳

pub mod error;
pub mod pincode;
pub mod pricing;
pub mod serviceability;

pub use error::DomainError;
pub use pincode::{Pincode, ServiceType};
pub use pricing::{CodAmount, FormattedRateBreakdown, PaymentMode, RateBreakdown};
pub use serviceability::{Serviceability, ServiceabilityRecord};
