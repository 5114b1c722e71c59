//! # 配送可否照会ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /check-pincode?pincode=...&type=pickup` - PIN コードの配送可否

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use shipquote_domain::{ServiceType, Serviceability};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{ErrorResponse, GatewayError, InvalidPincodeResponse},
    usecase::ServiceabilityUseCaseImpl,
};

/// 配送可否照会 API の共有状態
pub struct ServiceabilityState {
    pub usecase: ServiceabilityUseCaseImpl,
}

/// 配送可否照会のクエリパラメータ
///
/// 同じキーが複数ある場合は最初の値を使う。
#[derive(Debug, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CheckPincodeQuery {
    /// 6 文字以上の PIN コード
    pub pincode:      Option<String>,
    /// `pickup` で集荷、それ以外は配達として照会する
    #[serde(rename = "type")]
    pub service_type: Option<String>,
}

impl CheckPincodeQuery {
    /// クエリ文字列のキーと値の組から組み立てる
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::default(), |mut query, (key, value)| {
                match key.as_str() {
                    "pincode" => {
                        query.pincode.get_or_insert(value);
                    }
                    "type" => {
                        query.service_type.get_or_insert(value);
                    }
                    _ => {}
                }
                query
            })
    }
}

/// 配送可否照会レスポンス
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceabilityResponse {
    pub success:        bool,
    pub is_serviceable: bool,
    /// 所在地、または対象外の理由
    pub message:        String,
}

impl From<Serviceability> for ServiceabilityResponse {
    fn from(result: Serviceability) -> Self {
        Self {
            success:        true,
            is_serviceable: result.is_serviceable,
            message:        result.message,
        }
    }
}

/// PIN コードの配送可否を照会する
#[utoipa::path(
    get,
    path = "/check-pincode",
    tag = "serviceability",
    params(CheckPincodeQuery),
    responses(
        (status = 200, description = "照会結果", body = ServiceabilityResponse),
        (status = 400, description = "PIN コードが不正", body = InvalidPincodeResponse),
        (status = 500, description = "設定不備または上流 API の失敗", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn check_pincode(
    State(state): State<Arc<ServiceabilityState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ServiceabilityResponse>, GatewayError> {
    let query = CheckPincodeQuery::from_pairs(pairs);
    let service_type = ServiceType::from_query(query.service_type.as_deref());

    let result = state
        .usecase
        .check(query.pincode.as_deref(), service_type)
        .await?;

    Ok(Json(result.into()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_重複したキーは最初の値を使う() {
        let query = CheckPincodeQuery::from_pairs(pairs(&[
            ("pincode", "110001"),
            ("type", "pickup"),
            ("pincode", "400001"),
            ("type", "delivery"),
        ]));

        assert_eq!(
            query,
            CheckPincodeQuery {
                pincode:      Some("110001".to_string()),
                service_type: Some("pickup".to_string()),
            }
        );
    }

    #[test]
    fn test_未知のキーは無視する() {
        let query = CheckPincodeQuery::from_pairs(pairs(&[("pin", "110001"), ("utm", "x")]));

        assert_eq!(query, CheckPincodeQuery::default());
    }
}
