//! # 送料見積もりハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /get-rate` - 送料見積もり（マークアップ済みの内訳付き）
//!
//! リクエスト本文は Content-Type を問わず JSON として解釈する。
//! PIN コードと重量は文字列・数値のどちらでも受け付け、キャリアへそのまま転送する。

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shipquote_domain::{CodAmount, FormattedRateBreakdown, PaymentMode};
use utoipa::ToSchema;

use crate::{
    client::ChargesQuery,
    error::{ErrorResponse, GatewayError},
    usecase::RateUseCaseImpl,
};

/// 送料見積もり API の共有状態
pub struct RateState {
    pub usecase: RateUseCaseImpl,
}

/// 送料見積もりリクエスト
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetRateRequest {
    /// 集荷地の PIN コード
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "110001")]
    pub pickup_pincode:   Option<Value>,
    /// 配達先の PIN コード
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "400001")]
    pub delivery_pincode: Option<Value>,
    /// 重量（グラム）
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "500")]
    pub weight:           Option<Value>,
    /// `Prepaid` で前払い、それ以外は代引き
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Prepaid")]
    pub payment_mode:     Option<Value>,
    /// 代引き金額（解釈できない値は 0）
    #[serde(default)]
    #[schema(value_type = Option<f64>, example = 1500)]
    pub cod_amount:       Option<Value>,
}

impl GetRateRequest {
    /// キャリアへの照会条件に変換する
    fn into_query(self) -> ChargesQuery {
        let payment_mode =
            PaymentMode::from_request(self.payment_mode.as_ref().and_then(Value::as_str));

        ChargesQuery {
            pickup_pincode: forwarded_text(self.pickup_pincode.as_ref()),
            delivery_pincode: forwarded_text(self.delivery_pincode.as_ref()),
            weight: forwarded_text(self.weight.as_ref()),
            payment_mode,
            cod_amount: cod_amount(self.cod_amount.as_ref()),
        }
    }
}

/// キャリアに転送する文字列表現（未指定・`null` は空文字列）
fn forwarded_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// 代引き金額を寛容に解釈する
fn cod_amount(value: Option<&Value>) -> CodAmount {
    match value {
        Some(Value::Number(n)) => n.as_f64().map_or_else(CodAmount::zero, CodAmount::new),
        Some(Value::String(s)) => CodAmount::parse_lenient(s),
        _ => CodAmount::zero(),
    }
}

/// 送料見積もりレスポンス
///
/// 金額はすべて小数点以下 2 桁の文字列。
#[derive(Debug, Serialize, ToSchema)]
pub struct GetRateResponse {
    pub success:        bool,
    /// 顧客向け送料（GST 込み）
    #[schema(example = "128.00")]
    pub rate:           String,
    /// 運賃
    #[schema(example = "108.47")]
    pub freight:        String,
    /// 代引き手数料
    #[schema(example = "0.00")]
    pub cod_charges:    String,
    /// 課税対象額
    #[schema(example = "108.47")]
    pub taxable_amount: String,
    /// GST
    #[schema(example = "19.53")]
    pub gst:            String,
}

impl From<FormattedRateBreakdown> for GetRateResponse {
    fn from(breakdown: FormattedRateBreakdown) -> Self {
        Self {
            success:        true,
            rate:           breakdown.rate,
            freight:        breakdown.freight,
            cod_charges:    breakdown.cod_charges,
            taxable_amount: breakdown.taxable_amount,
            gst:            breakdown.gst,
        }
    }
}

/// 送料見積もりを取得する
#[utoipa::path(
    post,
    path = "/get-rate",
    tag = "rate",
    request_body = GetRateRequest,
    responses(
        (status = 200, description = "送料内訳", body = GetRateResponse),
        (status = 400, description = "見積もり不可", body = ErrorResponse),
        (status = 500, description = "設定不備・不正な本文・上流 API の失敗", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_rate(
    State(state): State<Arc<RateState>>,
    body: Bytes,
) -> Result<Json<GetRateResponse>, GatewayError> {
    let request: GetRateRequest =
        serde_json::from_slice(&body).map_err(|e| GatewayError::Internal(e.to_string()))?;

    let breakdown = state.usecase.quote(&request.into_query()).await?;

    Ok(Json(breakdown.formatted().into()))
}
