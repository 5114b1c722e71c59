//! # 配送可否の判定ルール
//!
//! キャリアの PIN コード情報を正規化した [`ServiceabilityRecord`] から、
//! 照会種別ごとに配送可否とメッセージを決定する。
//!
//! キャリアに該当レコードがない場合のメッセージ（郵便番号ディレクトリによる
//! フォールバック）もここで組み立てる。

use serde::Serialize;

use crate::ServiceType;

/// 正規化済みの PIN コード情報
///
/// キャリア API のレコード形状の揺れ（ネストした `postal_code` かフラットか）は
/// gateway のクライアント層で吸収し、この型に変換してから判定に渡す。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceabilityRecord {
    /// 地区名（`district`、なければ `city`）
    pub locality:   String,
    /// 州コード
    pub state_code: String,
    /// 集荷可能か
    pub pickup:     bool,
    /// 代引き配達可能か
    pub cod:        bool,
    /// 前払い配達可能か
    pub pre_paid:   bool,
    /// 現金配達可能か
    pub cash:       bool,
}

impl ServiceabilityRecord {
    /// 表示用の所在地文字列
    ///
    /// 地区名と州コードが両方ある場合は `"{地区}, {州}"`、それ以外は地区名のみ。
    pub fn location(&self) -> String {
        if !self.locality.is_empty() && !self.state_code.is_empty() {
            format!("{}, {}", self.locality, self.state_code)
        } else {
            self.locality.clone()
        }
    }

    /// 照会種別に応じて配送可否を判定する
    ///
    /// - 集荷: `pickup` が可であること
    /// - 配達: `pre_paid` / `cod` / `cash` のいずれかが可であること
    pub fn evaluate(&self, service_type: ServiceType) -> Serviceability {
        let location = self.location();
        match service_type {
            ServiceType::Pickup if self.pickup => Serviceability::serviceable(location),
            ServiceType::Pickup => Serviceability::unavailable(format!(
                "Pickup not available in {location}"
            )),
            ServiceType::Delivery if self.pre_paid || self.cod || self.cash => {
                Serviceability::serviceable(location)
            }
            ServiceType::Delivery => {
                Serviceability::unavailable(format!("No Delivery in {location}"))
            }
        }
    }
}

/// 配送可否の判定結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Serviceability {
    pub is_serviceable: bool,
    pub message:        String,
}

impl Serviceability {
    fn serviceable(message: String) -> Self {
        Self {
            is_serviceable: true,
            message,
        }
    }

    fn unavailable(message: String) -> Self {
        Self {
            is_serviceable: false,
            message,
        }
    }

    /// キャリア対象外だが、郵便番号ディレクトリで所在地が分かった場合
    pub fn not_serviceable_in(district: &str, state: &str) -> Self {
        Self::unavailable(format!("Not Serviceable in {district}, {state}"))
    }

    /// 郵便番号ディレクトリにも該当がない場合
    pub fn invalid_pincode() -> Self {
        Self::unavailable("Invalid Pincode".to_string())
    }

    /// 郵便番号ディレクトリの照会自体に失敗した場合
    pub fn directory_unavailable() -> Self {
        Self::unavailable("Service Not Available".to_string())
    }
}
