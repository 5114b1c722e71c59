//! # Gateway エラーハンドリング
//!
//! ユースケースが返すエラーと、axum レスポンスへの変換を定義する。
//!
//! | エラー | ステータス | 本文 |
//! |--------|-----------|------|
//! | `InvalidPincode` | 400 | `{success:false, isServiceable:false}` |
//! | `RateUnavailable` | 400 | `{success:false, message}` |
//! | `OriginRejected` | 403 | `{success:false, message:"Unauthorized"}` |
//! | `Configuration` / `Upstream` / `Internal` | 500 | `{success:false, message}` |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::client::CarrierError;

/// Gateway で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// PIN コードが未指定または短すぎる
    #[error("PIN コードが不正です")]
    InvalidPincode,

    /// サーバー設定の不備（トークン未設定など）
    #[error("{0}")]
    Configuration(String),

    /// 上流 API の呼び出し失敗・解析失敗
    #[error("{0}")]
    Upstream(String),

    /// キャリアが見積額を返さなかった
    #[error("{0}")]
    RateUnavailable(String),

    /// リクエストの処理中に発生したその他のエラー
    #[error("{0}")]
    Internal(String),

    /// 許可されていない Origin からのリクエスト
    #[error("Unauthorized")]
    OriginRejected,
}

impl From<CarrierError> for GatewayError {
    fn from(err: CarrierError) -> Self {
        GatewayError::Upstream(err.to_string())
    }
}

/// PIN コード不正時のレスポンス
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvalidPincodeResponse {
    pub success:        bool,
    pub is_serviceable: bool,
}

/// エラーレスポンス
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl GatewayError {
    /// エラーに対応する HTTP ステータス
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidPincode | GatewayError::RateUnavailable(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::OriginRejected => StatusCode::FORBIDDEN,
            GatewayError::Configuration(_)
            | GatewayError::Upstream(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            GatewayError::InvalidPincode => {
                return (
                    status,
                    Json(InvalidPincodeResponse {
                        success:        false,
                        is_serviceable: false,
                    }),
                )
                    .into_response();
            }
            GatewayError::Configuration(msg) => {
                tracing::error!(
                    error.category = "configuration",
                    error.kind = "carrier_token",
                    "設定エラー: {}",
                    msg
                );
            }
            GatewayError::Upstream(msg) => {
                tracing::error!(
                    error.category = "external_service",
                    error.kind = "upstream",
                    "上流 API エラー: {}",
                    msg
                );
            }
            GatewayError::Internal(msg) => {
                tracing::error!(
                    error.category = "internal",
                    error.kind = "request",
                    "内部エラー: {}",
                    msg
                );
            }
            GatewayError::RateUnavailable(msg) => {
                tracing::info!("見積もりを取得できませんでした: {}", msg);
            }
            GatewayError::OriginRejected => {}
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
