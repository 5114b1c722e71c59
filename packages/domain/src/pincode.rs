//! # PIN コードと照会種別
//!
//! 配送可否照会の入力となる値オブジェクトを定義する。
//!
//! | 型 | ラップ対象 | 用途 |
//! |---|-----------|------|
//! | [`Pincode`] | `String` | インドの郵便番号（6 文字以上） |
//! | [`ServiceType`] | enum | 集荷（pickup）か配達（delivery）か |

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::DomainError;

/// PIN コードの最小文字数
pub const PINCODE_MIN_LENGTH: usize = 6;

/// PIN コード（値オブジェクト）
///
/// # 不変条件
///
/// - 6 文字以上
///
/// 数字以外の文字は拒否しない。上流 API が該当なしとして扱う。
///
/// # 使用例
///
/// ```rust
/// use shipquote_domain::Pincode;
///
/// let pincode = Pincode::parse("110001").unwrap();
/// assert_eq!(pincode.as_str(), "110001");
///
/// assert!(Pincode::parse("1100").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct Pincode(String);

impl Pincode {
    /// 文字列から PIN コードを作成する
    ///
    /// # エラー
    ///
    /// 6 文字未満の場合は `DomainError::Validation` を返す。
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.chars().count() < PINCODE_MIN_LENGTH {
            return Err(DomainError::Validation(format!(
                "PIN コードは {PINCODE_MIN_LENGTH} 文字以上である必要があります"
            )));
        }
        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 照会種別
///
/// クエリパラメータ `type` から決定する。
/// `pickup` 以外（未指定を含む）はすべて配達として扱う。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ServiceType {
    /// 集荷
    Pickup,
    /// 配達
    #[default]
    Delivery,
}

impl ServiceType {
    /// クエリパラメータの値から照会種別を決定する
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("pickup") => Self::Pickup,
            _ => Self::Delivery,
        }
    }
}
