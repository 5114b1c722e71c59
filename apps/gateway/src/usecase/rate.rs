//! 送料見積もりユースケース

use std::sync::Arc;

use shipquote_domain::RateBreakdown;

use crate::{
    client::{CarrierClient, CarrierError, CarrierToken, ChargesQuery},
    error::GatewayError,
};

/// トークン未設定時のメッセージ
const TOKEN_MISSING: &str = "Server Config Error: Token Missing";

/// キャリアの本文が JSON でなかった場合のメッセージ
const UNPARSEABLE_RESPONSE: &str = "Server Error";

/// 送料見積もりユースケース
pub struct RateUseCaseImpl {
    carrier: Arc<dyn CarrierClient>,
    token:   Option<CarrierToken>,
}

impl RateUseCaseImpl {
    pub fn new(carrier: Arc<dyn CarrierClient>, token: Option<CarrierToken>) -> Self {
        Self { carrier, token }
    }

    /// キャリアの見積額にマークアップを乗せた送料内訳を返す
    ///
    /// 1. トークンが設定されていることを確認
    /// 2. キャリアの見積もり API を呼ぶ
    /// 3. 先頭要素の `total_amount` を取り出す（なければ見積もり不可）
    /// 4. 送料内訳を算出
    #[tracing::instrument(skip_all, fields(payment_mode = %query.payment_mode))]
    pub async fn quote(&self, query: &ChargesQuery) -> Result<RateBreakdown, GatewayError> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| GatewayError::Configuration(TOKEN_MISSING.to_string()))?;

        tracing::debug!(
            cod_amount = query.cod_amount.value(),
            "送料見積もりを取得します: {} | COD: {}",
            query.payment_mode.carrier_code(),
            query.cod_amount
        );

        let response = match self.carrier.fetch_charges(token, query).await {
            Ok(response) => response,
            Err(CarrierError::InvalidResponse(detail)) => {
                tracing::warn!("キャリアの見積もりレスポンスを解析できません: {}", detail);
                return Err(GatewayError::Upstream(UNPARSEABLE_RESPONSE.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let total = response
            .total_amount()
            .ok_or_else(|| GatewayError::RateUnavailable(response.error_text()))?;

        Ok(RateBreakdown::calculate(
            total,
            query.payment_mode,
            query.cod_amount,
        ))
    }
}
